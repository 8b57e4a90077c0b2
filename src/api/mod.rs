//! Typed client for the LAMPY REST API.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;
