//! Redash API client
//!
//! Wraps query CRUD and data source lookups behind typed methods. Every
//! operation is at most one round trip, except `create_query` with publish
//! (create, then publish) and anything that resolves a data source by name
//! (one extra listing call).

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, TransportResultExt};
use crate::domain::{
    DataSource, DataSourceId, DomainError, NewQuery, Query, QueryId, QueryUpdate,
};
use crate::infrastructure::traits::{HttpMethod, HttpRequest, HttpTransport};

/// Authenticated client for `{host}/api/...`.
///
/// Holds one shared session; no internal locking, no retries, no caching.
pub struct RedashClient {
    host: String,
    api_key: String,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for RedashClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedashClient")
            .field("host", &self.host)
            .field("api_key", &"***")
            .finish()
    }
}

impl RedashClient {
    pub fn new(
        host: impl Into<String>,
        api_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            transport,
        }
    }

    // ============================================================
    // QUERIES
    // ============================================================

    /// Create a query bound to the data source called `data_source_name`.
    ///
    /// With `publish`, a follow-up update clears the draft flag and its
    /// result is returned. If that second call fails the query stays
    /// created as a draft; nothing is rolled back.
    #[instrument(skip(self, query))]
    pub fn create_query(
        &self,
        name: &str,
        data_source_name: &str,
        query: &str,
        description: &str,
        publish: bool,
    ) -> ApplicationResult<Query> {
        let data_source = self.get_data_source_by_name(data_source_name)?;
        let payload = NewQuery {
            name: name.to_string(),
            data_source_id: data_source.id,
            query: query.to_string(),
            description: description.to_string(),
        };

        let created: Query = self.post("queries", &payload)?;
        debug!("created query {} (published={})", created.id, created.is_published());

        if publish {
            return self.update_query(created.id, &QueryUpdate::publish(true));
        }
        Ok(created)
    }

    /// Apply a partial update: only supplied fields are sent, and the draft
    /// flag is always set to `!update.publish`.
    #[instrument(skip(self, update))]
    pub fn update_query(&self, query_id: QueryId, update: &QueryUpdate) -> ApplicationResult<Query> {
        let data_source_id = match &update.data_source_name {
            Some(name) => Some(self.resolve_data_source_id(name)?),
            None => None,
        };
        let changes = update.to_changes(data_source_id);

        self.post(&format!("queries/{}", query_id), &changes)
    }

    /// Update `query_id` if it exists, otherwise create a new query.
    ///
    /// Creation ignores `query_id`: the server assigns a fresh id. Creating
    /// requires name, data source and query text in `update`.
    #[instrument(skip(self, update))]
    pub fn upsert_query(&self, query_id: QueryId, update: &QueryUpdate) -> ApplicationResult<Query> {
        if self.query_exists(query_id)? {
            debug!("query {} exists, updating", query_id);
            return self.update_query(query_id, update);
        }

        debug!("query {} not found, creating", query_id);
        let name = update
            .name
            .as_deref()
            .ok_or(DomainError::MissingParameter("name"))?;
        let data_source_name = update
            .data_source_name
            .as_deref()
            .ok_or(DomainError::MissingParameter("data_source_name"))?;
        let query = update
            .query
            .as_deref()
            .ok_or(DomainError::MissingParameter("query"))?;
        let description = update.description.as_deref().unwrap_or_default();

        self.create_query(name, data_source_name, query, description, update.publish)
    }

    #[instrument(skip(self))]
    pub fn get_query_by_id(&self, query_id: QueryId) -> ApplicationResult<Query> {
        self.get(&format!("queries/{}", query_id))
    }

    /// Existence probe: a 404 is `false`, any other failure propagates.
    #[instrument(skip(self))]
    pub fn query_exists(&self, query_id: QueryId) -> ApplicationResult<bool> {
        match self.get_query_by_id(query_id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ============================================================
    // DATA SOURCES
    // ============================================================

    /// All data sources in server order.
    #[instrument(skip(self))]
    pub fn list_data_sources(&self) -> ApplicationResult<Vec<DataSource>> {
        self.get("data_sources")
    }

    /// First data source whose name equals `name` exactly (case-sensitive).
    #[instrument(skip(self))]
    pub fn get_data_source_by_name(&self, name: &str) -> ApplicationResult<DataSource> {
        let data_sources = self.list_data_sources()?;
        debug!("scanning {} data sources for {:?}", data_sources.len(), name);

        data_sources
            .into_iter()
            .find(|ds| ds.name == name)
            .ok_or_else(|| DomainError::not_found(name).into())
    }

    fn resolve_data_source_id(&self, name: &str) -> ApplicationResult<DataSourceId> {
        self.get_data_source_by_name(name).map(|ds| ds.id)
    }

    // ============================================================
    // REQUEST PRIMITIVES
    // ============================================================

    fn get<T: DeserializeOwned>(&self, uri: &str) -> ApplicationResult<T> {
        self.execute(HttpMethod::Get, uri, None)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, uri: &str, payload: &B) -> ApplicationResult<T> {
        let body = serde_json::to_string(payload).with_request_context(HttpMethod::Post, uri)?;
        self.execute(HttpMethod::Post, uri, Some(body))
    }

    /// Send one request and classify the response:
    /// 200 decodes the body, 404 is `ResourceNotFound`, anything else is
    /// `ErrorResponse`.
    fn execute<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        uri: &str,
        body: Option<String>,
    ) -> ApplicationResult<T> {
        let mut request = HttpRequest::new(method, format!("{}/api/{}", self.host, uri))
            .header("Authorization", format!("Key {}", self.api_key));
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        let response = self
            .transport
            .send(&request)
            .with_request_context(method, uri)?;
        debug!("{} /api/{} -> {}", method, uri, response.status);

        match response.status {
            200 => serde_json::from_str(&response.body).with_request_context(method, uri),
            404 => Err(DomainError::not_found(format!("/api/{}", uri)).into()),
            status => Err(ApplicationError::ErrorResponse {
                status,
                method,
                uri: uri.to_string(),
            }),
        }
    }
}
