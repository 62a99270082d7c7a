//! Interpretation of read endpoint responses.
//!
//! The list may come from the database endpoint (a raw array), from an
//! empty-state object (`{message, submissions: []}`), or from something that
//! is not the API at all (a static host answering with HTML). Only a failure
//! of a reachable, configured backend is reported as an error.
use crate::models::envelope::ErrorEnvelope;
use crate::models::review::ReviewView;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub enum ListOutcome {
    Reviews(Vec<ReviewView>),
    /// Nothing to show because the backend is not set up; not an error.
    Unavailable { message: String },
    Failed { message: String },
}

/// A line shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl ListOutcome {
    pub fn into_parts(self) -> (Vec<ReviewView>, Option<Notice>) {
        match self {
            ListOutcome::Reviews(reviews) => (reviews, None),
            ListOutcome::Unavailable { message } => (
                Vec::new(),
                Some(Notice {
                    text: message,
                    is_error: false,
                }),
            ),
            ListOutcome::Failed { message } => (
                Vec::new(),
                Some(Notice {
                    text: message,
                    is_error: true,
                }),
            ),
        }
    }
}

#[derive(Deserialize)]
struct Wrapped {
    #[serde(default)]
    message: Option<String>,
    submissions: Vec<ReviewView>,
}

pub fn interpret_list_response(status: u16, content_type: Option<&str>, body: &str) -> ListOutcome {
    if status == 401 || status == 404 {
        return ListOutcome::Unavailable {
            message: "Reviews are not available yet".to_string(),
        };
    }

    let is_json = content_type.map_or(true, |ct| ct.to_ascii_lowercase().contains("json"));
    let parsed = if is_json {
        serde_json::from_str::<Value>(body).ok()
    } else {
        None
    };

    if !(200..300).contains(&status) {
        let envelope = parsed.and_then(|value| serde_json::from_value::<ErrorEnvelope>(value).ok());
        return match envelope {
            Some(envelope) => ListOutcome::Failed {
                message: envelope.message,
            },
            None => ListOutcome::Unavailable {
                message: format!("Reviews are unavailable right now (status {status})"),
            },
        };
    }

    let Some(value) = parsed else {
        return ListOutcome::Unavailable {
            message: "Reviews are unavailable in this environment".to_string(),
        };
    };

    match value {
        Value::Array(_) => match serde_json::from_value::<Vec<ReviewView>>(value) {
            Ok(reviews) => ListOutcome::Reviews(reviews),
            Err(_) => unexpected_format(),
        },
        Value::Object(ref fields) if fields.contains_key("submissions") => {
            match serde_json::from_value::<Wrapped>(value) {
                Ok(Wrapped {
                    message: Some(message),
                    submissions,
                }) if submissions.is_empty() => ListOutcome::Unavailable { message },
                Ok(wrapped) => ListOutcome::Reviews(wrapped.submissions),
                Err(_) => unexpected_format(),
            }
        }
        _ => unexpected_format(),
    }
}

fn unexpected_format() -> ListOutcome {
    ListOutcome::Failed {
        message: "Received reviews in an unexpected format".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json");

    #[test]
    fn raw_array_lists_reviews() {
        let body = r#"[{"id":2,"name":"Ann","movieName":"Dune","movieReview":"Great pacing","submittedAt":"3/9/2024"}]"#;
        let outcome = interpret_list_response(200, JSON, body);
        let ListOutcome::Reviews(reviews) = outcome else {
            panic!("expected reviews, got {outcome:?}");
        };
        assert_eq!(reviews[0].movie_name, "Dune");
        assert_eq!(reviews[0].id, Some(2));
    }

    #[test]
    fn wrapped_submissions_list_reviews() {
        let body = r#"{"submissions":[{"name":"Bo","movieName":"Heat","movieReview":"Tense"}]}"#;
        let (reviews, notice) = interpret_list_response(200, JSON, body).into_parts();
        assert_eq!(reviews.len(), 1);
        assert!(notice.is_none());
    }

    #[test]
    fn development_mode_is_an_empty_list_without_error() {
        let body = r#"{"message":"Running in development mode","info":"...","submissions":[]}"#;
        let (reviews, notice) = interpret_list_response(200, JSON, body).into_parts();
        assert!(reviews.is_empty());
        let notice = notice.unwrap();
        assert!(!notice.is_error);
        assert_eq!(notice.text, "Running in development mode");
    }

    #[test]
    fn html_and_unauthorized_are_unavailable() {
        let html = interpret_list_response(200, Some("text/html"), "<!DOCTYPE html><html></html>");
        assert!(matches!(html, ListOutcome::Unavailable { .. }));

        let unauthorized = interpret_list_response(401, JSON, r#"{"error":"Unauthorized"}"#);
        assert!(matches!(unauthorized, ListOutcome::Unavailable { .. }));

        let proxy = interpret_list_response(502, Some("text/html"), "<h1>Bad gateway</h1>");
        assert!(matches!(proxy, ListOutcome::Unavailable { .. }));
    }

    #[test]
    fn server_error_envelope_is_a_failure_with_its_message() {
        let body = r#"{"error":"Failed to fetch reviews","details":"disk I/O error","message":"Something went wrong on our side, please try again later"}"#;
        let (reviews, notice) = interpret_list_response(500, JSON, body).into_parts();
        assert!(reviews.is_empty());
        let notice = notice.unwrap();
        assert!(notice.is_error);
        assert!(notice.text.starts_with("Something went wrong"));
    }

    #[test]
    fn garbled_array_is_a_failure() {
        let outcome = interpret_list_response(200, JSON, r#"[{"id":"x"}]"#);
        assert!(matches!(outcome, ListOutcome::Failed { .. }));
    }
}
