pub mod assessment;
pub mod generated;
pub mod job;
pub mod scenario;

pub use assessment::{Assessment, AssessmentContent, AssessmentQuestion};
pub use generated::{
    AnalysisReport, AssessmentQuiz, GapFinding, GeneratedDetails, OptionDraft, QuestionType,
    QuizQuestion, ScenarioDraft,
};
pub use job::{Job, JobContext, JobDetails, LevelSpec, Training, TrainingDetail};
pub use scenario::{AnswerOption, OptionId, ScenarioNode};

use serde::de::DeserializeOwned;

use crate::error::store_error::DecodeSnafu;
use crate::error::StoreError;

/// Decode a raw store document into a typed record.
///
/// This is the single deserialization chokepoint. All code that reads
/// documents out of the store should call this instead of using
/// `serde_json::from_value` directly, so stored shape is validated on
/// every read rather than trusted.
pub fn parse_document<T: DeserializeOwned>(
    collection: &str,
    doc: serde_json::Value,
) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(|e| {
        DecodeSnafu {
            collection,
            message: e.to_string(),
        }
        .build()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_valid() {
        let doc = serde_json::json!({
            "_id": "job-1",
            "job_name": "Electrician",
            "job_code": 42,
            "classification": "Technical",
            "trainings": [
                {
                    "training_name": "Safety basics",
                    "levels": [{"level": 0, "difficulty": 3}]
                }
            ]
        });

        let job: Job = parse_document("job", doc).unwrap();
        assert_eq!(job.job_name, "Electrician");
        assert_eq!(job.trainings.len(), 1);
        assert_eq!(job.trainings[0].levels[0].difficulty, 3);
    }

    #[test]
    fn test_parse_document_malformed() {
        let doc = serde_json::json!({"job_name": 7});
        let result: Result<Job, _> = parse_document("job", doc);
        assert!(matches!(result, Err(StoreError::Decode { .. })));
    }
}
