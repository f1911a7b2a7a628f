//! Typed wrappers over the structured-generation capability.
//!
//! Each operation declares its output schema from the corresponding
//! [`crate::schema::generated`] type, invokes the provider, and
//! deserializes the returned JSON back into that type. Provider failures
//! propagate unchanged; a schema mismatch in the returned document is a
//! [`GenerationError::ParseResponse`].

use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::error::generation_error::ParseResponseSnafu;
use crate::error::GenerationError;
use crate::prompt::ComposedPrompt;
use crate::provider::{GenerationRequest, StructuredProvider};
use crate::schema::generated::{AnalysisReport, AssessmentQuiz, GeneratedDetails, ScenarioDraft};

const MAX_TOKENS: u32 = 4096;

/// Generate learning content (skills, objectives, responsibilities).
pub fn generate_details(
    provider: &dyn StructuredProvider,
    prompt: &ComposedPrompt,
) -> Result<GeneratedDetails, GenerationError> {
    run::<GeneratedDetails>(provider, "generated_details", prompt)
}

/// Generate a pre-assessment quiz.
pub fn generate_quiz(
    provider: &dyn StructuredProvider,
    prompt: &ComposedPrompt,
) -> Result<AssessmentQuiz, GenerationError> {
    run::<AssessmentQuiz>(provider, "assessment_quiz", prompt)
}

/// Generate one scenario question. The result carries no identifiers,
/// depth, or lineage; those are the tree builder's to attach.
pub fn generate_scenario(
    provider: &dyn StructuredProvider,
    prompt: &ComposedPrompt,
) -> Result<ScenarioDraft, GenerationError> {
    run::<ScenarioDraft>(provider, "scenario_draft", prompt)
}

/// Generate a skill-gap analysis report over submitted answers.
pub fn generate_analysis(
    provider: &dyn StructuredProvider,
    prompt: &ComposedPrompt,
) -> Result<AnalysisReport, GenerationError> {
    run::<AnalysisReport>(provider, "analysis_report", prompt)
}

fn run<T: JsonSchema + DeserializeOwned>(
    provider: &dyn StructuredProvider,
    schema_name: &str,
    prompt: &ComposedPrompt,
) -> Result<T, GenerationError> {
    let schema = serde_json::to_value(schemars::schema_for!(T)).map_err(|e| {
        ParseResponseSnafu {
            message: format!("schema for {schema_name} is not serializable: {e}"),
        }
        .build()
    })?;

    let request = GenerationRequest {
        system: prompt.system.clone(),
        user: prompt.user.clone(),
        schema_name: schema_name.to_string(),
        schema,
        max_tokens: MAX_TOKENS,
    };

    let value = provider.generate(&request)?;
    serde_json::from_value(value).map_err(|e| {
        ParseResponseSnafu {
            message: format!("{schema_name}: {e}"),
        }
        .build()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Provider that replays canned values and records requests.
    struct CannedProvider {
        responses: Mutex<Vec<serde_json::Value>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl CannedProvider {
        fn new(responses: Vec<serde_json::Value>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl StructuredProvider for CannedProvider {
        fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<serde_json::Value, GenerationError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.responses.lock().unwrap().remove(0))
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "none"
        }
    }

    fn prompt() -> ComposedPrompt {
        ComposedPrompt {
            system: "system".to_string(),
            user: "user".to_string(),
        }
    }

    #[test]
    fn test_generate_scenario_decodes_draft() {
        let provider = CannedProvider::new(vec![serde_json::json!({
            "scenario_description": "An audit is due tomorrow",
            "question_text": "What do you prepare first?",
            "options": [
                {"option_text": "Checklists", "explanation": "ok", "is_correct": true}
            ]
        })]);

        let draft = generate_scenario(&provider, &prompt()).unwrap();
        assert_eq!(draft.options.len(), 1);

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].schema_name, "scenario_draft");
        let required = requests[0].schema["required"].as_array().unwrap();
        assert!(required.iter().any(|r| r == "scenario_description"));
    }

    #[test]
    fn test_generate_scenario_schema_mismatch() {
        let provider = CannedProvider::new(vec![serde_json::json!({"nope": true})]);
        let err = generate_scenario(&provider, &prompt()).unwrap_err();
        assert!(matches!(err, GenerationError::ParseResponse { .. }));
    }

    #[test]
    fn test_generate_details_decodes() {
        let provider = CannedProvider::new(vec![serde_json::json!({
            "learning_objectives": ["read blueprints"],
            "skills": ["wiring"],
            "key_responsibilities": ["site safety"]
        })]);
        let details = generate_details(&provider, &prompt()).unwrap();
        assert_eq!(details.skills, vec!["wiring"]);
    }
}
