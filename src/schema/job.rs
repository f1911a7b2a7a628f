use serde::{Deserialize, Serialize};

use crate::store::DocumentId;

/// One difficulty entry within a training.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelSpec {
    pub level: u32,
    pub difficulty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Training {
    pub training_name: String,
    pub levels: Vec<LevelSpec>,
}

/// A job description document from the `job` collection. Read-only input
/// to the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub job_name: String,
    pub job_code: u32,
    pub classification: String,
    pub trainings: Vec<Training>,
}

/// Per-training detail projected for a single level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDetail {
    pub training_name: String,
    pub training_timing: String,
}

/// The composed job context fed to every generation prompt: placeholder
/// values for substitution plus the serialized payload for the user text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobContext {
    pub job_name: String,
    pub job_classification: String,
    pub training_details: Vec<TrainingDetail>,
}

/// Generated learning content persisted to the `job_details` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetails {
    pub job_id: DocumentId,
    pub skills: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub key_responsibilities: Vec<String>,
    pub generated_at: String,
}

/// Human-readable timing requirement for a training difficulty.
pub fn timing_for_difficulty(difficulty: u32) -> Option<&'static str> {
    match difficulty {
        3 => Some("required before starting or renewing a license in the role"),
        2 => Some("required within the first month in the role"),
        1 => Some("recommended"),
        0 => Some("not required"),
        _ => None,
    }
}
