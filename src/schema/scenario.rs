use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::DocumentId;

/// Opaque identifier assigned to every generated option.
///
/// Never produced by the generation gateway; always minted by the tree
/// builder immediately after generation, so sibling options with identical
/// text remain individually addressable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl OptionId {
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One selectable answer within a scenario node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub option_text: String,
    pub explanation: String,
    pub is_correct: bool,
    pub option_id: OptionId,
}

/// One question at a given depth of the branching scenario tree.
///
/// Root nodes are embedded inside the owning assessment document and carry
/// neither `quiz_id` nor `parent_option_id`; every deeper node is a
/// standalone document in the `scenario` collection referencing both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioNode {
    pub scenario_description: String,
    pub question_text: String,
    pub options: Vec<AnswerOption>,
    pub depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<DocumentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_option_id: Option<OptionId>,
}

impl ScenarioNode {
    /// Validate the node for structural correctness.
    pub fn validate(&self) -> Result<(), String> {
        if self.scenario_description.is_empty() {
            return Err("scenario_description is empty".to_string());
        }
        if self.question_text.is_empty() {
            return Err("question_text is empty".to_string());
        }
        if self.options.is_empty() {
            return Err("node has no options".to_string());
        }
        // A parent reference only makes sense on a node that also knows its
        // owning assessment.
        if self.parent_option_id.is_some() && self.quiz_id.is_none() {
            return Err("parent_option_id set without quiz_id".to_string());
        }
        Ok(())
    }

    pub fn is_root(&self) -> bool {
        self.parent_option_id.is_none()
    }
}
