use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::generation_error::{ApiSnafu, HttpSnafu, RetriesExhaustedSnafu};
use crate::error::GenerationError;
use crate::provider::{GenerationRequest, StructuredProvider};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const MAX_RETRIES: u32 = 3;

/// Provider using OpenAI structured outputs: the declared schema is passed
/// as a `json_schema` response format and the model's message content is
/// the conforming JSON document.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
            agent: ureq::agent(),
        }
    }
}

// -- OpenAI API request/response types --

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
    json_schema: SchemaFormat<'a>,
}

#[derive(Serialize)]
struct SchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Deserialize)]
struct ApiChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl StructuredProvider for OpenAiProvider {
    fn generate(&self, request: &GenerationRequest) -> Result<serde_json::Value, GenerationError> {
        let api_request = ApiRequest {
            model: &self.model,
            temperature: 0.0,
            max_tokens: request.max_tokens,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: &request.system,
                },
                ApiMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: SchemaFormat {
                    name: &request.schema_name,
                    strict: true,
                    schema: &request.schema,
                },
            },
        };

        for attempt in 0..MAX_RETRIES {
            match self
                .agent
                .post(API_URL)
                .set("authorization", &format!("Bearer {}", self.api_key))
                .set("content-type", "application/json")
                .send_json(&api_request)
            {
                Ok(resp) => {
                    let api_resp: ApiResponse = resp.into_json().map_err(|e| {
                        GenerationError::ParseResponse {
                            message: e.to_string(),
                            location: snafu::Location::default(),
                        }
                    })?;
                    return parse_choice(api_resp);
                }
                Err(ureq::Error::Status(code, resp)) => {
                    // Retryable: 429 and 5xx
                    if code == 429 || code >= 500 {
                        let retry_after = resp
                            .header("retry-after")
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or_else(|| 2u64.pow(attempt));

                        let error_body = resp.into_string().unwrap_or_default();
                        tracing::warn!(
                            attempt = attempt + 1,
                            status = code,
                            retry_after,
                            "retryable API error: {error_body}"
                        );
                        std::thread::sleep(std::time::Duration::from_secs(retry_after));
                        continue;
                    }

                    if code == 401 {
                        return Err(GenerationError::AuthFailed {
                            message: "invalid API key".to_string(),
                            location: snafu::Location::default(),
                        });
                    }

                    let error_body = resp.into_string().unwrap_or_default();
                    let message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                        .map(|e| e.error.message)
                        .unwrap_or_else(|_| format!("status {code}: {error_body}"));

                    return ApiSnafu { message }.fail();
                }
                Err(ureq::Error::Transport(t)) => {
                    return Err(Box::new(t)).context(HttpSnafu);
                }
            }
        }

        RetriesExhaustedSnafu {
            attempts: MAX_RETRIES,
        }
        .fail()
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn parse_choice(resp: ApiResponse) -> Result<serde_json::Value, GenerationError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::ParseResponse {
            message: "response has no choices".to_string(),
            location: snafu::Location::default(),
        })?;

    if let Some(refusal) = choice.message.refusal {
        return ApiSnafu {
            message: format!("model refused: {refusal}"),
        }
        .fail();
    }

    let content = choice
        .message
        .content
        .ok_or_else(|| GenerationError::ParseResponse {
            message: "choice has no content".to_string(),
            location: snafu::Location::default(),
        })?;

    serde_json::from_str(&content).map_err(|e| GenerationError::ParseResponse {
        message: format!("content is not valid JSON: {e}"),
        location: snafu::Location::default(),
    })
}
