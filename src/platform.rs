//! Discord transport: REST calls through `twilight-http` and the gateway
//! event loop through `twilight-gateway`.

pub mod gateway;
pub mod http;

pub use http::HttpPlatform;
