//! Response wrapper with assertion helpers for integration tests.

use axum::body::Body;
use http::StatusCode;
use http::header::HeaderMap;

/// Eagerly-collected HTTP response with sync assertion methods.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Vec<u8>,
}

impl TestResponse {
    /// Consume an `http::Response<Body>`, collecting the body into bytes.
    pub async fn from_response(resp: http::Response<Body>) -> Self {
        let (parts, body) = resp.into_parts();
        let body_bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("failed to collect response body")
            .to_vec();
        Self {
            status: parts.status,
            headers: parts.headers,
            body_bytes,
        }
    }

    // -- Assertions --

    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "expected status {expected}, got {}. Body: {}",
            self.status.as_u16(),
            String::from_utf8_lossy(&self.body_bytes),
        );
        self
    }

    pub fn assert_body_eq(&self, expected: &str) -> &Self {
        let body_str = String::from_utf8_lossy(&self.body_bytes);
        assert_eq!(body_str, expected, "unexpected response body");
        self
    }

    pub fn assert_body_contains(&self, needle: &str) -> &Self {
        let body_str = String::from_utf8_lossy(&self.body_bytes);
        assert!(
            body_str.contains(needle),
            "expected body to contain '{needle}', body was: {body_str}"
        );
        self
    }

    // -- Accessors --

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body_bytes.clone()).expect("response body is not valid UTF-8")
    }
}
