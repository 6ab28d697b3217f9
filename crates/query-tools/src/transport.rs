//! HTTP transport to the Denodo AI SDK.
//!
//! [`Transport::send`] never fails: every network, status, or decoding problem is folded into a
//! [`BackendOutcome`] so the normalizers can render it.

use crate::error::Result;
use crate::request::{BackendRequest, Payload};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::error::Error as _;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Classified result of one backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutcome {
    Success(Value),
    /// Network failure, timeout, non-2xx status, or undecodable body.
    TransportFailure(String),
    /// The backend answered with a JSON object carrying an `error` field.
    BackendError(String),
    /// The backend answered with nothing usable (`null`, `false`, `0`, `{}`, `[]`, `""`).
    EmptyResponse,
}

impl BackendOutcome {
    fn kind(&self) -> &'static str {
        match self {
            BackendOutcome::Success(_) => "success",
            BackendOutcome::TransportFailure(_) => "transport_failure",
            BackendOutcome::BackendError(_) => "backend_error",
            BackendOutcome::EmptyResponse => "empty_response",
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &BackendRequest) -> BackendOutcome;
}

/// reqwest-backed transport with a fixed base address, JSON headers and per-call timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // No idle pool: each call's connection is released when the call ends.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> std::result::Result<Url, String> {
        let raw = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| format!("Invalid URL '{raw}': {e}"))
    }

    async fn execute(&self, url: Url, request: &BackendRequest) -> BackendOutcome {
        let mut builder = self.client.request(request.method.clone(), url);
        builder = match &request.payload {
            Payload::Query(pairs) => builder.query(pairs),
            Payload::Json(body) => builder.json(body),
        };
        if let Some(creds) = &request.credentials {
            builder = builder.basic_auth(creds.username(), Some(creds.password()));
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => return BackendOutcome::TransportFailure(self.describe(&request.endpoint, &e)),
        };
        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => return BackendOutcome::TransportFailure(self.describe(&request.endpoint, &e)),
        };

        classify_response(&request.endpoint, status, &bytes)
    }

    fn describe(&self, endpoint: &str, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            return format!(
                "request to {endpoint} timed out after {}s",
                self.timeout.as_secs()
            );
        }
        sanitize_reqwest_error(e)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &BackendRequest) -> BackendOutcome {
        if request.method != Method::GET && request.method != Method::POST {
            return BackendOutcome::TransportFailure(format!(
                "unsupported HTTP method '{}'",
                request.method
            ));
        }

        let url = match self.endpoint_url(&request.endpoint) {
            Ok(u) => u,
            Err(msg) => return BackendOutcome::TransportFailure(msg),
        };

        debug!(
            endpoint = %request.endpoint,
            method = %request.method,
            has_credentials = request.credentials.is_some(),
            "sending backend request"
        );

        let outcome = self.execute(url, request).await;
        if !matches!(outcome, BackendOutcome::Success(_)) {
            warn!(
                endpoint = %request.endpoint,
                outcome = outcome.kind(),
                "backend call did not succeed"
            );
        }
        outcome
    }
}

/// Classify a completed HTTP exchange.
#[must_use]
pub fn classify_response(endpoint: &str, status: StatusCode, body: &[u8]) -> BackendOutcome {
    let parsed = serde_json::from_slice::<Value>(body);

    if !status.is_success() {
        if let Ok(Value::Object(obj)) = &parsed
            && let Some(err) = obj.get("error")
        {
            return BackendOutcome::BackendError(error_text(err));
        }
        let reason = status.canonical_reason().unwrap_or("Unknown");
        return BackendOutcome::TransportFailure(format!(
            "{endpoint} returned {} {reason}",
            status.as_u16()
        ));
    }

    match parsed {
        Ok(value) => classify_value(value),
        Err(e) => BackendOutcome::TransportFailure(format!("invalid JSON response: {e}")),
    }
}

fn classify_value(value: Value) -> BackendOutcome {
    match value {
        Value::Null | Value::Bool(false) => BackendOutcome::EmptyResponse,
        Value::Number(n) if n.as_f64() == Some(0.0) => BackendOutcome::EmptyResponse,
        Value::String(s) if s.is_empty() => BackendOutcome::EmptyResponse,
        Value::Array(a) if a.is_empty() => BackendOutcome::EmptyResponse,
        Value::Object(obj) if obj.is_empty() => BackendOutcome::EmptyResponse,
        Value::Object(obj) => match obj.get("error") {
            Some(err) => BackendOutcome::BackendError(error_text(err)),
            None => BackendOutcome::Success(Value::Object(obj)),
        },
        other => BackendOutcome::Success(other),
    }
}

fn error_text(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

/// Error text with its source chain, with the request URL stripped of credentials and query.
#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = inner.source();
    }
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: &str) -> BackendOutcome {
        classify_response("answerQuestion", StatusCode::OK, body.as_bytes())
    }

    #[test]
    fn success_object_is_passed_through() {
        assert_eq!(
            ok(r#"{"answer":"42"}"#),
            BackendOutcome::Success(json!({"answer": "42"}))
        );
    }

    #[test]
    fn error_field_wins_over_success_status() {
        assert_eq!(
            ok(r#"{"error":"invalid credentials","answer":"x"}"#),
            BackendOutcome::BackendError("invalid credentials".to_string())
        );
        assert_eq!(
            ok(r#"{"error":{"code":7}}"#),
            BackendOutcome::BackendError(r#"{"code":7}"#.to_string())
        );
    }

    #[test]
    fn falsy_bodies_are_empty_responses() {
        for body in ["null", "false", "0", "0.0", "{}", "[]", "\"\""] {
            assert_eq!(ok(body), BackendOutcome::EmptyResponse, "body {body}");
        }
    }

    #[test]
    fn malformed_json_is_a_transport_failure() {
        for body in ["", "<html>oops</html>", "{\"answer\":"] {
            assert!(
                matches!(ok(body), BackendOutcome::TransportFailure(ref m) if m.starts_with("invalid JSON response")),
                "body {body:?}"
            );
        }
    }

    #[test]
    fn non_success_status_prefers_backend_error_text() {
        let outcome = classify_response(
            "getMetadata",
            StatusCode::UNAUTHORIZED,
            br#"{"error":"invalid credentials"}"#,
        );
        assert_eq!(
            outcome,
            BackendOutcome::BackendError("invalid credentials".to_string())
        );

        let outcome = classify_response(
            "getMetadata",
            StatusCode::INTERNAL_SERVER_ERROR,
            b"boom",
        );
        assert_eq!(
            outcome,
            BackendOutcome::TransportFailure(
                "getMetadata returned 500 Internal Server Error".to_string()
            )
        );
    }

    #[test]
    fn truthy_scalars_are_successes() {
        assert_eq!(ok("1"), BackendOutcome::Success(json!(1)));
        assert_eq!(ok("true"), BackendOutcome::Success(json!(true)));
    }

    #[tokio::test]
    async fn unsupported_method_fails_without_connecting() {
        // Nothing listens on the discard port; a connection attempt would surface as a
        // connect error instead.
        let base = Url::parse("http://127.0.0.1:9").expect("url");
        let transport = HttpTransport::new(&base, Duration::from_secs(1)).expect("transport");
        let request = BackendRequest {
            endpoint: "answerQuestion".to_string(),
            method: Method::PUT,
            payload: Payload::Json(json!({"question": "q"})),
            credentials: None,
        };

        match transport.send(&request).await {
            BackendOutcome::TransportFailure(msg) => {
                assert!(msg.starts_with("unsupported HTTP method"), "{msg}");
                assert!(msg.contains("PUT"), "{msg}");
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[test]
    fn redact_url_strips_credentials_and_query() {
        let url = Url::parse("http://admin:pw@sdk.local:8008/similaritySearch?query=secret#f")
            .expect("url");
        assert_eq!(redact_url(&url), "http://sdk.local:8008/similaritySearch");
    }
}
