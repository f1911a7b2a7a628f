//! The scenario-tree builder.
//!
//! Each node goes through compose → generate → identify → persist, then
//! fans out: one child per option, one level deeper, until the fixed
//! generation bound. The builder exclusively owns option-id minting and the
//! wiring of `quiz_id`/`parent_option_id` references; generation never
//! produces identifiers.

use snafu::ResultExt;

use crate::error::forge_error::{GenerationSnafu, JsonSnafu, StoreSnafu};
use crate::error::store_error::RevisionConflictSnafu;
use crate::error::Result;
use crate::gateway;
use crate::prompt::{self, placeholder, PromptTemplate};
use crate::provider::StructuredProvider;
use crate::schema::{
    self, AnswerOption, Assessment, AssessmentQuestion, JobContext, JobDetails, OptionId,
    ScenarioDraft, ScenarioNode,
};
use crate::store::{collection, fetch_by_id, DocumentId, DocumentStore};

/// Number of generations expanded beyond the root: the root's options get
/// children, and those children's options get children. Not configurable.
pub const FAN_OUT_GENERATIONS: u32 = 2;

/// Retry budget for the optimistic append of the root node onto the
/// assessment's question sequence.
const MAX_APPEND_RETRIES: u32 = 3;

pub struct ScenarioTreeBuilder<'a> {
    store: &'a dyn DocumentStore,
    provider: &'a dyn StructuredProvider,
    base_template: PromptTemplate,
    follow_up_template: PromptTemplate,
}

impl<'a> ScenarioTreeBuilder<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        provider: &'a dyn StructuredProvider,
        base_template: PromptTemplate,
        follow_up_template: PromptTemplate,
    ) -> Self {
        Self {
            store,
            provider,
            base_template,
            follow_up_template,
        }
    }

    /// Build the full scenario tree for an assessment.
    ///
    /// Generates the root scenario, embeds it into the assessment's
    /// question sequence, then expands every option into its own child
    /// scenario down to [`FAN_OUT_GENERATIONS`] levels below the root.
    /// Fail-fast: the first template, generation, or store failure aborts
    /// the whole build; branches persisted before the failure stay in the
    /// store.
    pub fn build_tree(
        &self,
        assessment_id: &DocumentId,
        level: u32,
        job_context: &JobContext,
        job_details: &JobDetails,
    ) -> Result<()> {
        let context_payload = serde_json::to_string(job_context).context(JsonSnafu)?;
        let details_payload = serde_json::to_string(job_details).context(JsonSnafu)?;

        let root_prompt = prompt::compose(
            &self.base_template,
            &[
                (placeholder::JOB_NAME, job_context.job_name.clone()),
                (placeholder::LEVEL, level.to_string()),
            ],
            &[context_payload, details_payload],
        );

        let draft = gateway::generate_scenario(self.provider, &root_prompt)
            .context(GenerationSnafu)?;
        let root = attach_identity(draft, level, None, None);

        self.append_root(assessment_id, &root)?;
        tracing::info!(
            assessment = %assessment_id,
            options = root.options.len(),
            depth = root.depth,
            "root scenario embedded"
        );

        self.fan_out(assessment_id, &root, FAN_OUT_GENERATIONS)
    }

    /// Expand one child per option of `parent`, depth-first per branch,
    /// left-to-right in generation order.
    fn fan_out(
        &self,
        assessment_id: &DocumentId,
        parent: &ScenarioNode,
        remaining: u32,
    ) -> Result<()> {
        if remaining == 0 {
            return Ok(());
        }

        for option in &parent.options {
            let follow_up = prompt::compose(
                &self.follow_up_template,
                &[
                    (placeholder::SCENARIO, parent.scenario_description.clone()),
                    (placeholder::ANSWER_TEXT, option.option_text.clone()),
                    (placeholder::DEPTH, (parent.depth + 1).to_string()),
                ],
                &[],
            );

            let draft = gateway::generate_scenario(self.provider, &follow_up)
                .context(GenerationSnafu)?;
            let child = attach_identity(
                draft,
                parent.depth + 1,
                Some(assessment_id.clone()),
                Some(option.option_id.clone()),
            );

            let doc = serde_json::to_value(&child).context(JsonSnafu)?;
            let child_id = self
                .store
                .insert(collection::SCENARIO, doc)
                .context(StoreSnafu)?;
            tracing::debug!(
                scenario = %child_id,
                parent_option = %option.option_id,
                depth = child.depth,
                "scenario node persisted"
            );

            self.fan_out(assessment_id, &child, remaining - 1)?;
        }

        Ok(())
    }

    /// Append the root node to the assessment's question sequence.
    ///
    /// The sequence is a read-modify-write on a shared document, so the
    /// write is conditional on the revision that was read; on a conflict
    /// the whole read-append-write cycle is retried.
    fn append_root(&self, assessment_id: &DocumentId, root: &ScenarioNode) -> Result<()> {
        for attempt in 0..MAX_APPEND_RETRIES {
            let doc = fetch_by_id(self.store, collection::ASSESSMENT, assessment_id)
                .context(StoreSnafu)?;
            let assessment: Assessment =
                schema::parse_document(collection::ASSESSMENT, doc).context(StoreSnafu)?;

            let mut questions = assessment.assessment.questions;
            questions.push(AssessmentQuestion::Scenario(root.clone()));

            let query = serde_json::json!({
                "_id": assessment_id,
                "revision": assessment.revision,
            });
            let fields = serde_json::json!({
                "assessment": { "questions": questions },
                "revision": assessment.revision + 1,
            });

            let written = self
                .store
                .update_one(collection::ASSESSMENT, &query, &fields)
                .context(StoreSnafu)?;
            if written {
                return Ok(());
            }
            tracing::warn!(
                assessment = %assessment_id,
                attempt = attempt + 1,
                "assessment changed during root append, retrying"
            );
        }

        RevisionConflictSnafu {
            attempts: MAX_APPEND_RETRIES,
        }
        .fail()
        .context(StoreSnafu)
    }
}

/// Turn a generated draft into an addressable node: mint an id for every
/// option and wire the lineage references.
fn attach_identity(
    draft: ScenarioDraft,
    depth: u32,
    quiz_id: Option<DocumentId>,
    parent_option_id: Option<OptionId>,
) -> ScenarioNode {
    ScenarioNode {
        scenario_description: draft.scenario_description,
        question_text: draft.question_text,
        options: draft
            .options
            .into_iter()
            .map(|o| AnswerOption {
                option_text: o.option_text,
                explanation: o.explanation,
                is_correct: o.is_correct,
                option_id: OptionId::mint(),
            })
            .collect(),
        depth,
        quiz_id,
        parent_option_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OptionDraft;

    fn draft(options: u32) -> ScenarioDraft {
        ScenarioDraft {
            scenario_description: "desc".to_string(),
            question_text: "q".to_string(),
            options: (0..options)
                .map(|i| OptionDraft {
                    option_text: format!("option {i}"),
                    explanation: "why".to_string(),
                    is_correct: i == 0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_attach_identity_mints_distinct_ids() {
        let node = attach_identity(draft(4), 1, None, None);
        let mut ids: Vec<_> = node.options.iter().map(|o| o.option_id.clone()).collect();
        ids.sort_by(|a, b| a.0.cmp(&b.0));
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert!(node.is_root());
        assert_eq!(node.depth, 1);
    }

    #[test]
    fn test_attach_identity_wires_lineage() {
        let parent_option = OptionId::mint();
        let node = attach_identity(
            draft(2),
            3,
            Some(DocumentId("a1".to_string())),
            Some(parent_option.clone()),
        );
        assert_eq!(node.quiz_id, Some(DocumentId("a1".to_string())));
        assert_eq!(node.parent_option_id, Some(parent_option));
        assert!(!node.is_root());
    }
}
