//! Test utilities for relay integration tests.

pub mod harness;
mod mock;
pub mod relay_api;
pub mod request;
pub mod response;

pub use harness::{AppHarness, AppHarnessBuilder};
pub use mock::{MockKongAdmin, MockResponse, RecordedRequest, RouteKey, unreachable_base_url};
pub use request::RequestCase;
pub use response::TestResponse;

pub use crate::api::rest::handlers::DECODE_FAILURE_MESSAGE;
