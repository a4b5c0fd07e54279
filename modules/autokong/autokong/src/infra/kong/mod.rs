mod client;
pub(crate) mod request_builder;

pub use client::KongAdminClient;
