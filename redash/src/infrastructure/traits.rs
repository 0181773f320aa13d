//! I/O boundary traits for testability
//!
//! The HTTP session is abstracted behind [`HttpTransport`], allowing the
//! client to be tested with mock implementations.

use std::fmt;
use std::io;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method;

/// HTTP verbs used against the Redash API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        };
        f.write_str(verb)
    }
}

/// A fully built request: absolute URL, headers and optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header value (case-insensitive name match).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status code and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP session abstraction.
///
/// Implementations send the request as given and report any status code as
/// `Ok`; only failures to exchange a request at all are errors.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Blocking reqwest session, reused across calls.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a session. `timeout` of `None` means requests never time out.
    pub fn new(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        builder = builder.timeout(timeout);
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(io::Error::other)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(io::Error::other)?;

        Ok(HttpResponse { status, body })
    }
}
