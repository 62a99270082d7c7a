use crate::client::http::{post_form_collection, post_review, ClientError};
use crate::client::ClientConfig;
use crate::models::envelope::SubmitResponse;
use crate::models::review::ReviewSubmission;
use leptos::logging::warn;
use std::fmt::Display;
use std::future::Future;

/// Result of a write that may have gone to two independent backends.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted<T> {
    /// What the database endpoint returned, if it was called and succeeded.
    pub stored: Option<T>,
    /// Set when the secondary write failed after the primary succeeded.
    pub warning: Option<String>,
}

/// Runs the primary write, then the secondary one.
///
/// Only the primary decides the outcome. A secondary failure is logged and
/// reported as a warning; the primary write stays in place since the two
/// backends share no transaction. The secondary is not started when the
/// primary fails.
pub async fn dual_write<P, S, T, E>(primary: P, secondary: S) -> Result<Submitted<T>, E>
where
    P: Future<Output = Result<(), E>>,
    S: Future<Output = Result<T, E>>,
    E: Display,
{
    primary.await?;
    match secondary.await {
        Ok(stored) => Ok(Submitted {
            stored: Some(stored),
            warning: None,
        }),
        Err(e) => {
            warn!("[CLIENT] Database write failed, form submission kept: {}", e);
            Ok(Submitted {
                stored: None,
                warning: Some(e.to_string()),
            })
        }
    }
}

/// Sends a review to every backend the deploy target writes to.
pub async fn submit(
    config: &ClientConfig,
    submission: &ReviewSubmission,
) -> Result<Submitted<SubmitResponse>, ClientError> {
    match &config.forms_endpoint {
        Some(forms_endpoint) => {
            dual_write(
                post_form_collection(forms_endpoint, &config.form_name, submission),
                post_review(&config.submit_endpoint, submission),
            )
            .await
        }
        None => post_review(&config.submit_endpoint, submission)
            .await
            .map(|response| Submitted {
                stored: Some(response),
                warning: None,
            }),
    }
}

/// URL-encodes a submission together with the form name the forms
/// collection files it under.
pub fn encode_form(form_name: &str, submission: &ReviewSubmission) -> String {
    std::iter::once(("form-name", form_name.to_string()))
        .chain(submission.form_fields())
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn secondary_failure_is_only_a_warning() {
        let outcome = dual_write(async { Ok::<(), String>(()) }, async {
            Err::<u32, String>("database down".to_string())
        })
        .await
        .unwrap();
        assert_eq!(outcome.stored, None);
        assert_eq!(outcome.warning.as_deref(), Some("database down"));
    }

    #[tokio::test]
    async fn primary_failure_is_fatal_and_skips_secondary() {
        let secondary_ran = Cell::new(false);
        let result = dual_write(async { Err::<(), String>("forms rejected".to_string()) }, async {
            secondary_ran.set(true);
            Ok::<u32, String>(1)
        })
        .await;
        assert_eq!(result.unwrap_err(), "forms rejected");
        assert!(!secondary_ran.get());
    }

    #[tokio::test]
    async fn both_succeeding_returns_stored_record() {
        let outcome = dual_write(async { Ok::<(), String>(()) }, async { Ok::<u32, String>(7) })
            .await
            .unwrap();
        assert_eq!(outcome.stored, Some(7));
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn form_body_is_url_encoded() {
        let submission = ReviewSubmission::new("Ann Lee", "Dune: Part Two", "5/5 & more");
        assert_eq!(
            encode_form("movie-review", &submission),
            "form-name=movie-review&name=Ann%20Lee&movie-name=Dune%3A%20Part%20Two&movie-review=5%2F5%20%26%20more"
        );
    }
}
