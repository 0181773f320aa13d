//! Test doubles for the HTTP transport

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use redash::application::RedashClient;
use redash::infrastructure::traits::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

pub const HOST: &str = "http://redash.test";
pub const API_KEY: &str = "test-key";

/// In-memory Redash server: data sources, queries, id assignment.
///
/// New queries start as drafts, like the real service. Every request is
/// recorded for inspection.
pub struct FakeRedash {
    data_sources: Vec<Value>,
    queries: Mutex<BTreeMap<i64, Map<String, Value>>>,
    next_id: Mutex<i64>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeRedash {
    pub fn new() -> Self {
        Self {
            data_sources: vec![
                json!({"id": 1, "name": "pg_main", "type": "pg", "syntax": "sql", "paused": 0, "view_only": false, "pause_reason": null}),
                json!({"id": 2, "name": "athena_logs", "type": "athena", "syntax": "sql", "paused": 0, "view_only": false, "pause_reason": null}),
            ],
            queries: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(100),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_data_sources(mut self, data_sources: Vec<Value>) -> Self {
        self.data_sources = data_sources;
        self
    }

    /// Seed an existing query.
    pub fn with_query(self, id: i64, name: &str, data_source_id: i64, query: &str) -> Self {
        let record = json!({
            "id": id,
            "name": name,
            "data_source_id": data_source_id,
            "query": query,
            "description": null,
            "is_draft": false,
            "schedule": null,
        });
        if let Value::Object(map) = record {
            self.queries.lock().unwrap().insert(id, map);
        }
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests as `"METHOD /api/path"` strings.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.trim_start_matches(HOST)))
            .collect()
    }

    pub fn stored_query(&self, id: i64) -> Option<Value> {
        self.queries
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .map(Value::Object)
    }

    fn ok(body: Value) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    fn not_found() -> HttpResponse {
        HttpResponse {
            status: 404,
            body: json!({"message": "Couldn't find resource. Please login and try again."})
                .to_string(),
        }
    }

    fn create(&self, body: Value) -> HttpResponse {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let mut record = Map::new();
        record.insert("id".into(), json!(id));
        record.insert("is_draft".into(), json!(true));
        record.insert("schedule".into(), Value::Null);
        if let Value::Object(fields) = body {
            record.extend(fields);
        }
        self.queries.lock().unwrap().insert(id, record.clone());
        Self::ok(Value::Object(record))
    }

    fn update(&self, id: i64, body: Value) -> HttpResponse {
        let mut queries = self.queries.lock().unwrap();
        let Some(record) = queries.get_mut(&id) else {
            return Self::not_found();
        };
        if let Value::Object(fields) = body {
            record.extend(fields);
        }
        Self::ok(Value::Object(record.clone()))
    }
}

impl HttpTransport for FakeRedash {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let expected = format!("Key {}", API_KEY);
        if request.header_value("Authorization") != Some(expected.as_str()) {
            return Ok(HttpResponse {
                status: 401,
                body: "{}".into(),
            });
        }

        let path = request
            .url
            .strip_prefix(&format!("{}/api/", HOST))
            .unwrap_or_default()
            .to_string();
        let segments: Vec<&str> = path.split('/').collect();
        let body: Value = request
            .body
            .as_deref()
            .map(|b| serde_json::from_str(b).expect("request body is JSON"))
            .unwrap_or(Value::Null);

        let response = match (request.method, segments.as_slice()) {
            (HttpMethod::Get, ["data_sources"]) => Self::ok(Value::Array(self.data_sources.clone())),
            (HttpMethod::Post, ["queries"]) => self.create(body),
            (HttpMethod::Get, ["queries", id]) => match id.parse::<i64>() {
                Ok(id) => match self.queries.lock().unwrap().get(&id) {
                    Some(record) => Self::ok(Value::Object(record.clone())),
                    None => Self::not_found(),
                },
                Err(_) => Self::not_found(),
            },
            (HttpMethod::Post, ["queries", id]) => match id.parse::<i64>() {
                Ok(id) => self.update(id, body),
                Err(_) => Self::not_found(),
            },
            _ => Self::not_found(),
        };
        Ok(response)
    }
}

/// Transport replaying a fixed sequence of responses.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<io::Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, kind: io::ErrorKind) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(io::Error::new(kind, "connection refused")));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: no scripted response left")
    }
}

pub fn client_for(transport: Arc<dyn HttpTransport>) -> RedashClient {
    RedashClient::new(HOST, API_KEY, transport)
}

/// Parse the JSON body of a recorded request.
pub fn body_of(request: &HttpRequest) -> Value {
    serde_json::from_str(request.body.as_deref().expect("request has a body")).unwrap()
}
