//! Domain entities: Redash records and request payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned identifier of a saved query.
pub type QueryId = i64;

/// Server-assigned identifier of a data source.
pub type DataSourceId = i64;

/// A saved, named SQL statement bound to one data source.
///
/// Only `id` and `name` are decoded eagerly. Every other field stays in
/// `extra` exactly as the server sent it (absent, null or valued), so a
/// record prints back without gaining or losing keys. The accessors below
/// read the fields this crate reasons about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: QueryId,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Query {
    pub fn data_source_id(&self) -> Option<DataSourceId> {
        self.extra.get("data_source_id").and_then(Value::as_i64)
    }

    /// SQL text; `None` when absent or null.
    pub fn query_text(&self) -> Option<&str> {
        self.extra.get("query").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.extra.get("description").and_then(Value::as_str)
    }

    pub fn is_draft(&self) -> Option<bool> {
        self.extra.get("is_draft").and_then(Value::as_bool)
    }

    /// Published only when the server says the query is not a draft.
    pub fn is_published(&self) -> bool {
        self.is_draft() == Some(false)
    }
}

/// A named connection configuration that queries execute against.
///
/// Read-only from the client's perspective. Flags such as `paused`,
/// `pause_reason` and `view_only` pass through `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: DataSourceId,
    pub name: String,
    /// Type tag, e.g. "pg" or "athena"
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /api/queries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewQuery {
    pub name: String,
    pub data_source_id: DataSourceId,
    pub query: String,
    pub description: String,
}

/// Body of `POST /api/queries/{id}`: only supplied fields are serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<DataSourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_draft: bool,
}

/// Partial update of a query as requested by a caller.
///
/// `None` means "leave unchanged"; `Some("")` is a real value and is sent.
/// The data source is referenced by name and resolved to an id before the
/// request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryUpdate {
    pub name: Option<String>,
    pub data_source_name: Option<String>,
    pub query: Option<String>,
    pub description: Option<String>,
    pub publish: bool,
}

impl Default for QueryUpdate {
    fn default() -> Self {
        Self {
            name: None,
            data_source_name: None,
            query: None,
            description: None,
            publish: true,
        }
    }
}

impl QueryUpdate {
    /// An update that only toggles the published state.
    pub fn publish(publish: bool) -> Self {
        Self {
            publish,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_data_source(mut self, data_source_name: impl Into<String>) -> Self {
        self.data_source_name = Some(data_source_name.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the wire payload; `data_source_id` is the resolved id of
    /// `data_source_name`, if one was given.
    pub fn to_changes(&self, data_source_id: Option<DataSourceId>) -> QueryChanges {
        QueryChanges {
            name: self.name.clone(),
            data_source_id,
            query: self.query.clone(),
            description: self.description.clone(),
            is_draft: !self.publish,
        }
    }
}
