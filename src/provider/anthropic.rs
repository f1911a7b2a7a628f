use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::generation_error::{ApiSnafu, HttpSnafu, RetriesExhaustedSnafu};
use crate::error::GenerationError;
use crate::provider::{GenerationRequest, StructuredProvider};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_RETRIES: u32 = 3;

/// Name of the single tool the model is forced to call; its input schema is
/// the declared output schema, so the tool input IS the structured result.
const EMIT_TOOL: &str = "emit_structured";

pub struct AnthropicProvider {
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| "claude-sonnet-4-5-20250929".to_string()),
            agent: ureq::agent(),
        }
    }
}

// -- Anthropic API request/response types --

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
    tools: Vec<ApiToolDef<'a>>,
    tool_choice: ToolChoice<'a>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ApiToolDef<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a serde_json::Value,
}

#[derive(Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ApiContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContentBlock {
    Text {
        #[allow(dead_code)]
        text: String,
    },
    ToolUse {
        input: serde_json::Value,
    },
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl StructuredProvider for AnthropicProvider {
    fn generate(&self, request: &GenerationRequest) -> Result<serde_json::Value, GenerationError> {
        // The API rejects empty user content; follow-up prompts legitimately
        // carry everything in the system text.
        let user = if request.user.is_empty() {
            "Produce the structured output now."
        } else {
            request.user.as_str()
        };

        let api_request = ApiRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: vec![ApiMessage {
                role: "user",
                content: user,
            }],
            tools: vec![ApiToolDef {
                name: EMIT_TOOL,
                description: "Emit the structured result.",
                input_schema: &request.schema,
            }],
            tool_choice: ToolChoice {
                choice_type: "tool",
                name: EMIT_TOOL,
            },
        };

        for attempt in 0..MAX_RETRIES {
            match self
                .agent
                .post(API_URL)
                .set("x-api-key", &self.api_key)
                .set("anthropic-version", ANTHROPIC_VERSION)
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
                    return extract_tool_input(api_resp);
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
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn extract_tool_input(resp: ApiResponse) -> Result<serde_json::Value, GenerationError> {
    resp.content
        .into_iter()
        .find_map(|block| match block {
            ApiContentBlock::ToolUse { input } => Some(input),
            ApiContentBlock::Text { .. } => None,
        })
        .ok_or_else(|| GenerationError::ParseResponse {
            message: "response contains no tool_use block".to_string(),
            location: snafu::Location::default(),
        })
}
