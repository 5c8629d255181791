//! Request/response types for the `/chat` wire contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result-count hint sent with every question.
pub const DEFAULT_TOP_K: u32 = 5;

/// Body of a POST to `/chat`.
///
/// The reserved filter fields are opaque to this client (the server contract
/// defines their semantics), but they must appear in the body as explicit
/// `null`s, so none of them carry `skip_serializing_if`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskRequest {
    pub question: String,
    pub k: u32,
    pub score_threshold: Option<f64>,
    pub doc_type: Option<String>,
    pub filename: Option<String>,
}

impl AskRequest {
    /// Build a request for a trimmed, non-empty question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            k: DEFAULT_TOP_K,
            score_threshold: None,
            doc_type: None,
            filename: None,
        }
    }
}

/// Response body from `/chat`. Only `answer` is consumed; everything else
/// the server sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

/// Errors surfaced by a dispatch.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;
