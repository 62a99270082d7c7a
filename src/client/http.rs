use crate::client::dispatch::encode_form;
use crate::client::listing::{interpret_list_response, ListOutcome};
use crate::models::envelope::{ErrorEnvelope, SubmitResponse};
use crate::models::review::ReviewSubmission;
use gloo_net::http::{Request, Response};
use leptos::logging::log;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Could not reach the server: {0}")]
    Network(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response from the server: {0}")]
    Decode(String),
}

pub async fn post_review(
    endpoint: &str,
    submission: &ReviewSubmission,
) -> Result<SubmitResponse, ClientError> {
    let response = Request::post(endpoint)
        .json(submission)
        .map_err(|e| ClientError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    let response = check(response).await?;
    response
        .json::<SubmitResponse>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Posts the review the way the plain HTML form would, so the forms
/// collection captures it.
pub async fn post_form_collection(
    endpoint: &str,
    form_name: &str,
    submission: &ReviewSubmission,
) -> Result<(), ClientError> {
    let response = Request::post(endpoint)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(encode_form(form_name, submission))
        .map_err(|e| ClientError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    check(response).await?;
    log!("[CLIENT] Form collection accepted the review");
    Ok(())
}

pub async fn fetch_reviews(endpoint: &str) -> ListOutcome {
    let response = match Request::get(endpoint)
        .header("Cache-Control", "no-cache")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            log!("[CLIENT] Fetching reviews failed: {}", e);
            return ListOutcome::Failed {
                message: "Could not reach the reviews service".to_string(),
            };
        }
    };

    let status = response.status();
    let content_type = response.headers().get("content-type");
    let body = response.text().await.unwrap_or_default();
    interpret_list_response(status, content_type.as_deref(), &body)
}

async fn check(response: Response) -> Result<Response, ClientError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope.message,
        Err(_) => format!("Submission failed (status {status})"),
    };
    Err(ClientError::Rejected { status, message })
}
