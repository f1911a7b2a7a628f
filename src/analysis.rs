//! LLM skill-gap analysis of submitted answers.

use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::forge_error::{GenerationSnafu, JsonSnafu};
use crate::error::Result;
use crate::gateway;
use crate::prompt::{self, placeholder, PromptTemplate};
use crate::provider::StructuredProvider;
use crate::schema::AnalysisReport;

/// Built-in instruction for the analysis pass. Unlike the pipeline prompts
/// this is not a stored template: it has no per-job content to vary.
const ANALYSIS_SYSTEM: &str = "\
You are an expert in analyzing exam answers. You will be given the user's \
answers together with the original questions, the correct answers, and each \
question's category. Analyze accuracy per category, identify skill or \
knowledge areas where the user has gaps, and produce exactly four feedback \
items. For each item give a short title, a focus level (Critical Focus, \
Moderate Focus, or Minor Focus), a gap percentage, and a concise, actionable \
analysis. Respond in the {lang} language.";

/// One answer as submitted by a user, joined with the question it answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub question_category: String,
}

/// Produce a skill-gap report over a set of submitted answers. Pure
/// generation; nothing is persisted.
pub fn analyze_answers(
    provider: &dyn StructuredProvider,
    answers: &[SubmittedAnswer],
    lang: &str,
) -> Result<AnalysisReport> {
    let template = PromptTemplate {
        system: ANALYSIS_SYSTEM.to_string(),
        user: String::new(),
    };
    let payload = serde_json::to_string(answers).context(JsonSnafu)?;
    let prompt = prompt::compose(
        &template,
        &[(placeholder::LANG, lang.to_string())],
        &[payload, format!("\nAnswer in {lang} language:")],
    );

    gateway::generate_analysis(provider, &prompt).context(GenerationSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::provider::GenerationRequest;
    use std::sync::Mutex;

    struct RecordingProvider {
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl StructuredProvider for RecordingProvider {
        fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<serde_json::Value, GenerationError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(serde_json::json!({
                "feedback": [{
                    "title": "Situational judgement",
                    "gap": "70%",
                    "priority": "Critical Focus",
                    "ai_analysis": "Review escalation procedures."
                }]
            }))
        }

        fn name(&self) -> &str {
            "recording"
        }

        fn model(&self) -> &str {
            "none"
        }
    }

    #[test]
    fn test_analyze_substitutes_language_and_sends_answers() {
        let provider = RecordingProvider {
            requests: Mutex::new(Vec::new()),
        };
        let answers = vec![SubmittedAnswer {
            question: "Is gear optional?".to_string(),
            selected_answer: "Yes".to_string(),
            correct_answer: "No".to_string(),
            question_category: "behavior".to_string(),
        }];

        let report = analyze_answers(&provider, &answers, "en").unwrap();
        assert_eq!(report.feedback.len(), 1);
        assert_eq!(report.feedback[0].priority, "Critical Focus");

        let requests = provider.requests.lock().unwrap();
        assert!(requests[0].system.contains("Respond in the en language"));
        assert!(!requests[0].system.contains("{lang}"));
        assert!(requests[0].user.contains("Is gear optional?"));
        assert!(requests[0].user.ends_with("Answer in en language:"));
    }
}
