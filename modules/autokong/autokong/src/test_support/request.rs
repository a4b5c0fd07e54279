//! Fluent request builder for integration tests.

use axum::body::Body;
use http::header::HeaderMap;
use http::{HeaderValue, Method};
use tower::ServiceExt;

use super::harness::AppHarness;
use super::response::TestResponse;

/// Fluent HTTP request builder tied to an [`AppHarness`].
pub struct RequestCase<'a> {
    harness: &'a AppHarness,
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Body>,
}

impl<'a> RequestCase<'a> {
    pub(crate) fn new(harness: &'a AppHarness, method: Method, path: impl Into<String>) -> Self {
        Self {
            harness,
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Serialize `value` as the JSON body.
    pub fn with_json(mut self, value: &serde_json::Value) -> Self {
        self.body = Some(Body::from(value.to_string()));
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self
    }

    /// Send `raw` as-is, without a content type.
    pub fn with_raw_body(mut self, raw: impl Into<String>) -> Self {
        self.body = Some(Body::from(raw.into()));
        self
    }

    /// Send the request and return the collected response.
    pub async fn send(self) -> TestResponse {
        let mut builder = http::Request::builder()
            .method(self.method)
            .uri(&self.path);

        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        let body = self.body.unwrap_or_else(Body::empty);
        let request = builder.body(body).expect("failed to build request");

        let router = self.harness.router().clone();
        let response = router
            .oneshot(request)
            .await
            .expect("router returned error");

        TestResponse::from_response(response).await
    }

    /// Send and assert the expected status code.
    pub async fn expect_status(self, status: u16) -> TestResponse {
        let resp = self.send().await;
        resp.assert_status(status);
        resp
    }
}
