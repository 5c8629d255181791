//! Backend `/chat` endpoint client.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{AskRequest, AskResponse, BackendError, Result, DEFAULT_TOP_K};
