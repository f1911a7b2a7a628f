//! Output shapes the generation gateway asks the provider to produce.
//!
//! These types double as the declared JSON schemas for schema-constrained
//! generation: the gateway derives a schema from the type, sends it with the
//! request, and deserializes the provider's output back into the same type.
//! None of them carry identifiers or tree references; those are attached by
//! the tree builder after generation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Job details
// ---------------------------------------------------------------------------

/// Structured learning content generated from a job description.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedDetails {
    pub learning_objectives: Vec<String>,
    pub skills: Vec<String>,
    pub key_responsibilities: Vec<String>,
}

// ---------------------------------------------------------------------------
// Pre-assessment quiz
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
}

/// One general quiz question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuizQuestion {
    /// The text of the quiz question.
    pub question: String,
    /// Answer choices, in display order.
    pub options: Vec<String>,
    /// Must match one of the choices.
    pub correct_answer: String,
    pub explanation: String,
    pub question_type: QuestionType,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssessmentQuiz {
    pub questions: Vec<QuizQuestion>,
}

// ---------------------------------------------------------------------------
// Scenario questions
// ---------------------------------------------------------------------------

/// One answer option as generated, before any identity is attached.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OptionDraft {
    pub option_text: String,
    pub explanation: String,
    pub is_correct: bool,
}

/// One scenario question as generated, before identity, depth, or lineage is attached.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioDraft {
    pub scenario_description: String,
    pub question_text: String,
    pub options: Vec<OptionDraft>,
}

// ---------------------------------------------------------------------------
// Answer analysis
// ---------------------------------------------------------------------------

/// One skill-gap finding in the analysis report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GapFinding {
    /// Two-or-three word summary of the finding.
    pub title: String,
    /// Gap percentage, as text.
    pub gap: String,
    /// Priority level (critical / moderate / minor focus).
    pub priority: String,
    pub ai_analysis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    pub feedback: Vec<GapFinding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_wire_format() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");
        let parsed: QuestionType = serde_json::from_str("\"true_false\"").unwrap();
        assert_eq!(parsed, QuestionType::TrueFalse);
    }

    #[test]
    fn test_scenario_draft_decodes_provider_output() {
        let json = serde_json::json!({
            "scenario_description": "A deadline slips",
            "question_text": "What next?",
            "options": [
                {"option_text": "Tell the customer", "explanation": "honesty", "is_correct": true},
                {"option_text": "Say nothing", "explanation": "risky", "is_correct": false}
            ]
        });
        let draft: ScenarioDraft = serde_json::from_value(json).unwrap();
        assert_eq!(draft.options.len(), 2);
        assert!(draft.options[0].is_correct);
    }

    #[test]
    fn test_schema_declares_required_scenario_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(ScenarioDraft)).unwrap();
        let required = schema["required"].as_array().unwrap();
        for field in ["scenario_description", "question_text", "options"] {
            assert!(required.iter().any(|r| r == field), "missing {field}");
        }
    }
}
