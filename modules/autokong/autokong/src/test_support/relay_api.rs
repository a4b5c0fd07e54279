//! Endpoint factory for the relay's inbound surface.

use http::Method;

use super::harness::AppHarness;
use super::request::RequestCase;

pub struct RelayApi<'a> {
    harness: &'a AppHarness,
}

impl<'a> RelayApi<'a> {
    pub(crate) fn new(harness: &'a AppHarness) -> Self {
        Self { harness }
    }

    pub fn add(&self) -> RequestCase<'a> {
        self.add_with_method(Method::POST)
    }

    pub fn add_with_method(&self, method: Method) -> RequestCase<'a> {
        RequestCase::new(self.harness, method, "/add")
    }

    pub fn remove(&self, method: Method) -> RequestCase<'a> {
        RequestCase::new(self.harness, method, "/remove")
    }
}
