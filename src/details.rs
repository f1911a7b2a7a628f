//! Job-details and pre-assessment generation: the pipeline stages that
//! run before the scenario tree is grown.

use chrono::Utc;
use snafu::ResultExt;

use crate::config::TemplateIds;
use crate::error::forge_error::{GenerationSnafu, JsonSnafu, StoreSnafu};
use crate::error::Result;
use crate::gateway;
use crate::prompt::{self, placeholder};
use crate::provider::StructuredProvider;
use crate::schema::{
    self, AssessmentQuestion, Job, JobContext, JobDetails, TrainingDetail,
};
use crate::store::{collection, fetch_by_id, DocumentId, DocumentStore};
use crate::tree::ScenarioTreeBuilder;

/// Ids of the documents created by one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub job_details_id: DocumentId,
    pub assessment_id: DocumentId,
}

/// Generate learning content, a pre-assessment quiz, and the scenario tree
/// for one job at one level.
///
/// Stages run sequentially and fail fast; a failure in a later stage leaves
/// the artifacts of earlier stages in the store.
pub fn run_pipeline(
    store: &dyn DocumentStore,
    provider: &dyn StructuredProvider,
    templates: &TemplateIds,
    job_id: &DocumentId,
    level: u32,
) -> Result<PipelineOutcome> {
    let doc = fetch_by_id(store, collection::JOB, job_id).context(StoreSnafu)?;
    let job: Job = schema::parse_document(collection::JOB, doc).context(StoreSnafu)?;

    let context = JobContext {
        job_name: job.job_name.clone(),
        job_classification: job.classification.clone(),
        training_details: level_data(&job, level),
    };
    let context_payload = serde_json::to_string(&context).context(JsonSnafu)?;

    // Stage 1: learning content.
    let details_template = prompt::load_template(store, &templates.details)?;
    let details_prompt = prompt::compose(
        &details_template,
        &[
            (placeholder::JOB_NAME, context.job_name.clone()),
            (placeholder::LEVEL, level.to_string()),
        ],
        &[context_payload.clone()],
    );
    let generated = gateway::generate_details(provider, &details_prompt).context(GenerationSnafu)?;

    let job_details = JobDetails {
        job_id: job.id.clone(),
        skills: generated.skills,
        learning_objectives: generated.learning_objectives,
        key_responsibilities: generated.key_responsibilities,
        generated_at: Utc::now().to_rfc3339(),
    };
    let details_doc = serde_json::to_value(&job_details).context(JsonSnafu)?;
    let job_details_id = store
        .insert(collection::JOB_DETAILS, details_doc)
        .context(StoreSnafu)?;
    tracing::info!(job = %job_id, details = %job_details_id, "job details generated");

    // Stage 2: pre-assessment quiz.
    let assessment_id = generate_pre_assessment(
        store,
        provider,
        &templates.assessment,
        &job,
        level,
        &context,
        &job_details,
    )?;
    tracing::info!(assessment = %assessment_id, "pre-assessment created");

    // Stage 3: scenario tree.
    let base_template = prompt::load_template(store, &templates.scenario_base)?;
    let follow_up_template = prompt::load_template(store, &templates.follow_up)?;
    let builder = ScenarioTreeBuilder::new(store, provider, base_template, follow_up_template);
    builder.build_tree(&assessment_id, level, &context, &job_details)?;

    Ok(PipelineOutcome {
        job_details_id,
        assessment_id,
    })
}

/// Generate the quiz and create the assessment document it lives in.
/// Returns the new assessment's id.
pub fn generate_pre_assessment(
    store: &dyn DocumentStore,
    provider: &dyn StructuredProvider,
    assessment_template_id: &str,
    job: &Job,
    level: u32,
    context: &JobContext,
    job_details: &JobDetails,
) -> Result<DocumentId> {
    let template = prompt::load_template(store, assessment_template_id)?;
    let context_payload = serde_json::to_string(context).context(JsonSnafu)?;
    let details_payload = serde_json::to_string(job_details).context(JsonSnafu)?;

    let quiz_prompt = prompt::compose(
        &template,
        &[
            (placeholder::JOB_NAME, context.job_name.clone()),
            (placeholder::LEVEL, level.to_string()),
        ],
        &[context_payload, details_payload],
    );
    let quiz = gateway::generate_quiz(provider, &quiz_prompt).context(GenerationSnafu)?;

    let questions: Vec<AssessmentQuestion> = quiz
        .questions
        .into_iter()
        .map(AssessmentQuestion::General)
        .collect();

    let doc = serde_json::json!({
        "job_id": job.id,
        "level": level,
        "revision": 0,
        "assessment": { "questions": questions },
    });
    store.insert(collection::ASSESSMENT, doc).context(StoreSnafu)
}

/// Project per-training details for one level. Trainings without an entry
/// for the level, or with an unknown difficulty, are skipped.
fn level_data(job: &Job, level: u32) -> Vec<TrainingDetail> {
    job.trainings
        .iter()
        .filter_map(|training| {
            let spec = training.levels.get(level as usize)?;
            let timing = schema::job::timing_for_difficulty(spec.difficulty)?;
            Some(TrainingDetail {
                training_name: training.training_name.clone(),
                training_timing: timing.to_string(),
            })
        })
        .collect()
}
