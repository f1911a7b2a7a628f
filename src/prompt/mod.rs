use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::ResultExt;

use crate::error::forge_error::{StoreSnafu, TemplateSnafu};
use crate::error::template_error::{MissingSystemSnafu, NotFoundSnafu};
use crate::error::{Result, TemplateError};
use crate::store::{collection, DocumentStore};

/// Placeholder tokens recognized in stored prompt templates.
pub mod placeholder {
    pub const JOB_NAME: &str = "{job_name}";
    pub const LEVEL: &str = "{level}";
    pub const SCENARIO: &str = "{scenario}";
    pub const ANSWER_TEXT: &str = "{answer_text}";
    pub const DEPTH: &str = "{depth}";
    pub const LANG: &str = "{lang}";
}

/// A prompt template as stored in the `prompt` collection. The `system`
/// text carries the placeholders; `user` is optional boilerplate most
/// templates leave empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
    #[serde(default)]
    pub user: String,
}

/// A fully substituted (system, user) instruction pair, ready for the
/// generation gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
}

/// Parse a template document fetched from the store. A document without a
/// string `system` key is malformed.
pub fn parse_template(template_id: &str, doc: &Value) -> Result<PromptTemplate, TemplateError> {
    let system = doc
        .get("system")
        .and_then(Value::as_str)
        .ok_or_else(|| MissingSystemSnafu { template_id }.build())?;
    let user = doc.get("user").and_then(Value::as_str).unwrap_or_default();
    Ok(PromptTemplate {
        system: system.to_string(),
        user: user.to_string(),
    })
}

/// Load and parse a prompt template by id.
pub fn load_template(store: &dyn DocumentStore, template_id: &str) -> Result<PromptTemplate> {
    let query = serde_json::json!({ "_id": template_id });
    let doc = store
        .find_one(collection::PROMPT, &query)
        .context(StoreSnafu)?
        .ok_or_else(|| NotFoundSnafu { template_id }.build())
        .context(TemplateSnafu)?;
    parse_template(template_id, &doc).context(TemplateSnafu)
}

/// Render a template into an instruction pair.
///
/// Every occurrence of each substitution token in the system text is
/// replaced with its value; tokens without a substitution are left
/// verbatim. The user text is the template's own user boilerplate followed
/// by the string forms of the payload values, concatenated in order.
pub fn compose(
    template: &PromptTemplate,
    substitutions: &[(&str, String)],
    payload: &[String],
) -> ComposedPrompt {
    let mut system = template.system.clone();
    for (token, value) in substitutions {
        system = system.replace(token, value);
    }
    let mut user = template.user.clone();
    for part in payload {
        user.push_str(part);
    }
    ComposedPrompt { system, user }
}
