pub mod data_api;
pub mod memory;

pub use data_api::DataApiStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::store_error::NotFoundSnafu;
use crate::error::StoreError;

/// Collections the pipeline reads and writes.
pub mod collection {
    pub const JOB: &str = "job";
    pub const ASSESSMENT: &str = "assessment";
    pub const SCENARIO: &str = "scenario";
    pub const JOB_DETAILS: &str = "job_details";
    pub const PROMPT: &str = "prompt";
}

/// Opaque document identifier. The store assigns these on insert; the
/// pipeline only threads them through queries and references and never
/// inspects their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generic document persistence over named collections.
///
/// Queries are flat JSON objects matched by exact equality on each named
/// top-level field. `update_one` replaces only the named top-level fields
/// and reports whether a document was updated.
pub trait DocumentStore: Send + Sync {
    fn insert(&self, collection: &str, document: Value) -> Result<DocumentId, StoreError>;
    fn find_one(&self, collection: &str, query: &Value) -> Result<Option<Value>, StoreError>;
    fn find(&self, collection: &str, query: &Value) -> Result<Vec<Value>, StoreError>;
    fn update_one(&self, collection: &str, query: &Value, fields: &Value)
        -> Result<bool, StoreError>;
}

/// Fetch a document by id, failing if it is absent.
pub fn fetch_by_id(
    store: &dyn DocumentStore,
    collection: &str,
    id: &DocumentId,
) -> Result<Value, StoreError> {
    let query = serde_json::json!({ "_id": id });
    store.find_one(collection, &query)?.ok_or_else(|| {
        NotFoundSnafu {
            collection,
            key: id.to_string(),
        }
        .build()
    })
}
