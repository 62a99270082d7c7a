// src/models/envelope.rs
//! Response bodies shared by the write and read endpoints and understood by
//! the browser client.
use crate::models::review::ReviewView;
use serde::{Deserialize, Serialize};

/// Body of a successful write.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub data: ReviewView,
}

impl SubmitResponse {
    pub fn ok(message: impl Into<String>, data: ReviewView) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Body of every failed request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
    pub error: String,   // Short category, e.g. "Validation failed"
    pub details: String, // Underlying cause or field detail
    pub message: String, // Human-readable sentence for the UI
}

/// Informational body returned by the read endpoint when there is nothing to
/// list yet because a backend is not provisioned.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmptyState {
    pub message: String,
    pub info: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_forms: Vec<String>,
    #[serde(default)]
    pub submissions: Vec<ReviewView>,
}

impl EmptyState {
    pub fn development() -> Self {
        Self {
            message: "Running in development mode".to_string(),
            info: "Reviews will be listed once a database is configured".to_string(),
            available_forms: Vec::new(),
            submissions: Vec::new(),
        }
    }

    pub fn no_submissions(form_name: &str, available_forms: Vec<String>) -> Self {
        Self {
            message: "No submissions yet".to_string(),
            info: format!("The form \"{form_name}\" has not received any submissions"),
            available_forms,
            submissions: Vec::new(),
        }
    }
}
