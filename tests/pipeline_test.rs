//! End-to-end pipeline: job details, pre-assessment quiz, scenario tree.

use std::sync::Mutex;

use serde_json::{json, Value};

use skillforge::config::TemplateIds;
use skillforge::details::run_pipeline;
use skillforge::error::{ForgeError, GenerationError, TemplateError};
use skillforge::provider::{GenerationRequest, StructuredProvider};
use skillforge::schema::{self, Assessment};
use skillforge::store::{collection, DocumentId, DocumentStore, MemoryStore};

/// Provider that answers every gateway operation with a canned document and
/// records the requests it saw.
struct PipelineProvider {
    scenario_calls: Mutex<u32>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl PipelineProvider {
    fn new() -> Self {
        Self {
            scenario_calls: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl StructuredProvider for PipelineProvider {
    fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        match request.schema_name.as_str() {
            "generated_details" => Ok(json!({
                "learning_objectives": ["read blueprints"],
                "skills": ["wiring", "troubleshooting"],
                "key_responsibilities": ["site safety"],
            })),
            "assessment_quiz" => Ok(json!({
                "questions": [
                    {
                        "question": "Is safety gear optional?",
                        "options": ["Yes", "No"],
                        "correct_answer": "No",
                        "explanation": "Gear is mandatory on site.",
                        "question_type": "true_false",
                    },
                    {
                        "question": "Which tool checks live wires?",
                        "options": ["Multimeter", "Hammer", "Tape", "Level"],
                        "correct_answer": "Multimeter",
                        "explanation": "A multimeter measures voltage.",
                        "question_type": "multiple_choice",
                    }
                ]
            })),
            "scenario_draft" => {
                let mut calls = self.scenario_calls.lock().unwrap();
                *calls += 1;
                let call = *calls;
                Ok(json!({
                    "scenario_description": format!("scenario {call}"),
                    "question_text": format!("question {call}"),
                    "options": [
                        {"option_text": format!("s{call} keep calm"), "explanation": "ok", "is_correct": true},
                        {"option_text": format!("s{call} escalate"), "explanation": "ok", "is_correct": false}
                    ]
                }))
            }
            other => panic!("unexpected schema: {other}"),
        }
    }

    fn name(&self) -> &str {
        "pipeline"
    }

    fn model(&self) -> &str {
        "none"
    }
}

fn seed_job(store: &MemoryStore) -> DocumentId {
    store.seed(
        collection::JOB,
        json!({
            "_id": "j1",
            "job_name": "Electrician",
            "job_code": 11,
            "classification": "Technical",
            "trainings": [
                {"training_name": "Wiring", "levels": [{"level": 0, "difficulty": 3}]}
            ]
        }),
    )
}

fn seed_templates(store: &MemoryStore) -> TemplateIds {
    let entries = [
        ("tpl-details", "Describe the {job_name} role at level {level}."),
        ("tpl-assessment", "Quiz for {job_name} at level {level}."),
        ("tpl-base", "Root scenario for {job_name} at level {level}."),
        ("tpl-follow", "Parent: {scenario} Answer: {answer_text} Depth: {depth}"),
    ];
    for (id, system) in entries {
        store.seed(
            collection::PROMPT,
            json!({"_id": id, "system": system, "user": ""}),
        );
    }
    TemplateIds {
        details: "tpl-details".to_string(),
        assessment: "tpl-assessment".to_string(),
        scenario_base: "tpl-base".to_string(),
        follow_up: "tpl-follow".to_string(),
    }
}

#[test]
fn test_pipeline_produces_details_quiz_and_tree() {
    let store = MemoryStore::new();
    let provider = PipelineProvider::new();
    let job_id = seed_job(&store);
    let templates = seed_templates(&store);

    let outcome = run_pipeline(&store, &provider, &templates, &job_id, 0).unwrap();

    // Job details were persisted.
    let details_doc = store
        .find_one(collection::JOB_DETAILS, &json!({"job_id": "j1"}))
        .unwrap()
        .expect("job details document");
    assert_eq!(details_doc["skills"][0], "wiring");
    assert_eq!(DocumentId(details_doc["_id"].as_str().unwrap().to_string()), outcome.job_details_id);

    // The assessment holds the quiz plus the embedded scenario root.
    let doc = skillforge::store::fetch_by_id(&store, collection::ASSESSMENT, &outcome.assessment_id)
        .unwrap();
    let assessment: Assessment = schema::parse_document(collection::ASSESSMENT, doc).unwrap();
    assert_eq!(assessment.level, 0);
    assert_eq!(assessment.assessment.questions.len(), 3);
    assert_eq!(assessment.scenario_roots().count(), 1);
    assert_eq!(assessment.revision, 1);

    // Two options per node, two generations: 2 children + 4 grandchildren.
    assert_eq!(store.count(collection::SCENARIO), 6);

    // details + quiz + 7 scenario generations.
    assert_eq!(provider.request_count(), 9);

    // Placeholders were substituted from the job document.
    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests[0].system, "Describe the Electrician role at level 0.");
    assert!(requests[0].user.contains("\"job_name\":\"Electrician\""));
    // The quiz prompt payload includes the generated details.
    assert!(requests[1].user.contains("troubleshooting"));
}

#[test]
fn test_pipeline_aborts_before_generation_without_templates() {
    let store = MemoryStore::new();
    let provider = PipelineProvider::new();
    let job_id = seed_job(&store);
    let templates = TemplateIds::default();

    let err = run_pipeline(&store, &provider, &templates, &job_id, 0).unwrap_err();
    assert!(matches!(
        err,
        ForgeError::Template {
            source: TemplateError::NotFound { .. },
            ..
        }
    ));
    assert_eq!(provider.request_count(), 0);
    assert_eq!(store.count(collection::JOB_DETAILS), 0);
    assert_eq!(store.count(collection::ASSESSMENT), 0);
}

#[test]
fn test_pipeline_rejects_template_without_system_before_generating() {
    let store = MemoryStore::new();
    let provider = PipelineProvider::new();
    let job_id = seed_job(&store);
    let mut templates = seed_templates(&store);

    store.seed(collection::PROMPT, json!({"_id": "tpl-broken", "user": "x"}));
    templates.details = "tpl-broken".to_string();

    let err = run_pipeline(&store, &provider, &templates, &job_id, 0).unwrap_err();
    assert!(matches!(
        err,
        ForgeError::Template {
            source: TemplateError::MissingSystem { .. },
            ..
        }
    ));
    assert_eq!(provider.request_count(), 0);
}

#[test]
fn test_pipeline_requires_existing_job() {
    let store = MemoryStore::new();
    let provider = PipelineProvider::new();
    let templates = seed_templates(&store);

    let err = run_pipeline(
        &store,
        &provider,
        &templates,
        &DocumentId("missing".to_string()),
        0,
    )
    .unwrap_err();
    assert!(matches!(err, ForgeError::Store { .. }));
    assert_eq!(provider.request_count(), 0);
}
