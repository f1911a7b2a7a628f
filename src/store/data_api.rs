use serde_json::{json, Value};
use snafu::ResultExt;

use super::{DocumentId, DocumentStore};
use crate::error::store_error::{ApiSnafu, DecodeSnafu, HttpSnafu};
use crate::error::StoreError;

/// Document store backed by a MongoDB Atlas Data API endpoint.
///
/// Every operation is one POST to `{base_url}/action/<action>` carrying the
/// data source, database, collection, and operation payload. The API uses
/// exact-match filters, which is all the pipeline relies on.
pub struct DataApiStore {
    base_url: String,
    api_key: String,
    data_source: String,
    database: String,
    agent: ureq::Agent,
}

impl DataApiStore {
    /// Build a store from configuration. Fails when the endpoint or its API
    /// key is not configured.
    pub fn from_config(config: &crate::config::StoreConfig) -> crate::error::Result<Self> {
        use crate::error::forge_error::ConfigSnafu;

        if config.base_url.is_empty() {
            return ConfigSnafu {
                message: "store.base_url is not configured".to_string(),
            }
            .fail();
        }
        let api_key = config.api_key().ok_or_else(|| {
            ConfigSnafu {
                message: "store API key not set (store.api_key_env or SKILLFORGE_STORE_KEY)"
                    .to_string(),
            }
            .build()
        })?;
        Ok(Self::new(
            config.base_url.clone(),
            api_key,
            config.data_source.clone(),
            config.database.clone(),
        ))
    }

    pub fn new(base_url: String, api_key: String, data_source: String, database: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            data_source,
            database,
            agent: ureq::agent(),
        }
    }

    fn call(&self, action: &str, collection: &str, payload: Value) -> Result<Value, StoreError> {
        let url = format!("{}/action/{action}", self.base_url);
        let mut body = json!({
            "dataSource": self.data_source,
            "database": self.database,
            "collection": collection,
        });
        if let (Some(target), Some(extra)) = (body.as_object_mut(), payload.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }

        match self
            .agent
            .post(&url)
            .set("api-key", &self.api_key)
            .set("content-type", "application/json")
            .send_json(&body)
        {
            Ok(resp) => resp.into_json().map_err(|e| {
                DecodeSnafu {
                    collection,
                    message: e.to_string(),
                }
                .build()
            }),
            Err(ureq::Error::Status(code, resp)) => {
                let message = resp.into_string().unwrap_or_default();
                tracing::warn!(status = code, action, collection, "store request failed");
                ApiSnafu {
                    status: code,
                    message,
                }
                .fail()
            }
            Err(ureq::Error::Transport(t)) => Err(Box::new(t)).context(HttpSnafu),
        }
    }
}

impl DocumentStore for DataApiStore {
    fn insert(&self, collection: &str, document: Value) -> Result<DocumentId, StoreError> {
        let resp = self.call("insertOne", collection, json!({ "document": document }))?;
        let id = resp
            .get("insertedId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DecodeSnafu {
                    collection,
                    message: "insertOne response missing insertedId".to_string(),
                }
                .build()
            })?;
        Ok(DocumentId(id.to_string()))
    }

    fn find_one(&self, collection: &str, query: &Value) -> Result<Option<Value>, StoreError> {
        let resp = self.call("findOne", collection, json!({ "filter": query }))?;
        match resp.get("document") {
            Some(Value::Null) | None => Ok(None),
            Some(doc) => Ok(Some(doc.clone())),
        }
    }

    fn find(&self, collection: &str, query: &Value) -> Result<Vec<Value>, StoreError> {
        let resp = self.call("find", collection, json!({ "filter": query }))?;
        let docs = resp
            .get("documents")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(docs)
    }

    fn update_one(
        &self,
        collection: &str,
        query: &Value,
        fields: &Value,
    ) -> Result<bool, StoreError> {
        let resp = self.call(
            "updateOne",
            collection,
            json!({ "filter": query, "update": { "$set": fields } }),
        )?;
        let modified = resp
            .get("modifiedCount")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        Ok(modified > 0)
    }
}
