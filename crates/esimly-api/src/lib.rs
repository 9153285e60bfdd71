// esimly-api: Async Rust client for the esimly storefront backend.

pub mod admin;
pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod retailer;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
