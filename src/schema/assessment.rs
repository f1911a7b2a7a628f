use serde::{Deserialize, Serialize};

use super::generated::QuizQuestion;
use super::scenario::ScenarioNode;
use crate::store::DocumentId;

/// One entry in an assessment's question sequence. General quiz questions
/// and embedded scenario roots share the sequence; the two shapes have
/// disjoint required fields, so the discriminator is the shape itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssessmentQuestion {
    General(QuizQuestion),
    Scenario(ScenarioNode),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentContent {
    pub questions: Vec<AssessmentQuestion>,
}

/// An assessment document. Created once per (job, level); mutated only by
/// appending generated scenario roots to `assessment.questions`.
///
/// `revision` guards that append: writers re-read the document, bump the
/// counter, and make the update conditional on the value they read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub job_id: DocumentId,
    pub level: u32,
    #[serde(default)]
    pub revision: u64,
    pub assessment: AssessmentContent,
}

impl Assessment {
    /// Embedded scenario roots, in question-sequence order.
    pub fn scenario_roots(&self) -> impl Iterator<Item = &ScenarioNode> {
        self.assessment.questions.iter().filter_map(|q| match q {
            AssessmentQuestion::Scenario(node) => Some(node),
            AssessmentQuestion::General(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment_doc() -> serde_json::Value {
        serde_json::json!({
            "_id": "a1",
            "job_id": "j1",
            "level": 1,
            "revision": 4,
            "assessment": {
                "questions": [
                    {
                        "question": "Is safety gear optional?",
                        "options": ["Yes", "No"],
                        "correct_answer": "No",
                        "explanation": "Gear is mandatory on site.",
                        "question_type": "true_false"
                    },
                    {
                        "scenario_description": "A colleague skips a checklist",
                        "question_text": "What do you do?",
                        "options": [{
                            "option_text": "Report it",
                            "explanation": "Checklists are mandatory.",
                            "is_correct": true,
                            "option_id": "opt-1"
                        }],
                        "depth": 1
                    }
                ]
            }
        })
    }

    #[test]
    fn test_polymorphic_question_sequence() {
        let assessment: Assessment = serde_json::from_value(assessment_doc()).unwrap();
        assert_eq!(assessment.assessment.questions.len(), 2);
        assert!(matches!(
            assessment.assessment.questions[0],
            AssessmentQuestion::General(_)
        ));
        assert!(matches!(
            assessment.assessment.questions[1],
            AssessmentQuestion::Scenario(_)
        ));
        assert_eq!(assessment.scenario_roots().count(), 1);
    }

    #[test]
    fn test_revision_defaults_to_zero() {
        let mut doc = assessment_doc();
        doc.as_object_mut().unwrap().remove("revision");
        let assessment: Assessment = serde_json::from_value(doc).unwrap();
        assert_eq!(assessment.revision, 0);
    }

    #[test]
    fn test_roundtrip_preserves_question_shapes() {
        let assessment: Assessment = serde_json::from_value(assessment_doc()).unwrap();
        let back = serde_json::to_value(&assessment).unwrap();
        assert_eq!(
            back["assessment"]["questions"][1]["options"][0]["option_id"],
            "opt-1"
        );
        assert_eq!(
            back["assessment"]["questions"][0]["question_type"],
            "true_false"
        );
    }
}
