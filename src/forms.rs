//! Client for the hosted forms-collection service (Netlify Forms API).
//!
//! Used by the endpoints when `REVIEW_BACKEND=forms`: submissions are posted
//! to the site the way a browser form post would be, and read back through
//! the site's forms API.
use crate::config::FormsConfig;
use crate::error::ApiError;
use crate::models::review::{format_submitted_at, NewReview, ReviewSubmission, ReviewView};
use chrono::{DateTime, Utc};
use leptos::logging::log;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FormSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub submission_count: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FormSubmission {
    pub id: String,
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub data: ReviewSubmission,
    pub created_at: DateTime<Utc>,
}

impl From<FormSubmission> for ReviewView {
    fn from(submission: FormSubmission) -> Self {
        let data = submission.data;
        Self {
            id: submission.number,
            name: data.name.unwrap_or_default(),
            movie_name: data.movie_name.unwrap_or_default(),
            movie_review: data.movie_review.unwrap_or_default(),
            submitted_at: Some(format_submitted_at(&submission.created_at)),
        }
    }
}

/// Outcome of reading the review form's submissions.
#[derive(Debug, Clone, PartialEq)]
pub enum FormListing {
    Reviews(Vec<ReviewView>),
    /// The form has not been created on the site yet (nothing ever submitted).
    NotProvisioned { available_forms: Vec<String> },
}

pub struct FormsClient {
    http: Client,
    api_base: String,
    site_id: String,
    access_token: String,
    site_url: Option<String>,
    form_name: String,
}

impl FormsClient {
    pub fn from_config(config: &FormsConfig) -> Result<Self, ApiError> {
        let site_id = config
            .site_id
            .clone()
            .ok_or(ApiError::NotConfigured("FORMS_SITE_ID is not set"))?;
        let access_token = config
            .access_token
            .clone()
            .ok_or(ApiError::NotConfigured("FORMS_ACCESS_TOKEN is not set"))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::FormsService(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            site_id,
            access_token,
            site_url: config.site_url.clone(),
            form_name: config.form_name.clone(),
        })
    }

    pub fn form_name(&self) -> &str {
        &self.form_name
    }

    pub async fn list_forms(&self) -> Result<Vec<FormSummary>, ApiError> {
        let url = format!("{}/sites/{}/forms", self.api_base, self.site_id);
        let response = self.get(&url).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::FormsService(format!("invalid forms listing: {e}")))
    }

    pub async fn list_submissions(&self, form_id: &str) -> Result<Vec<ReviewView>, ApiError> {
        let url = format!("{}/forms/{}/submissions", self.api_base, form_id);
        let response = self.get(&url).await?;
        let submissions: Vec<FormSubmission> = response
            .json()
            .await
            .map_err(|e| ApiError::FormsService(format!("invalid submissions listing: {e}")))?;
        Ok(newest_first(submissions))
    }

    /// Lists the review form's submissions, or reports that the form does not
    /// exist on the site yet.
    pub async fn reviews(&self) -> Result<FormListing, ApiError> {
        let forms = self.list_forms().await?;
        log!("[FORMS] Site has {} forms", forms.len());
        match select_form(&forms, &self.form_name) {
            Some(form) => Ok(FormListing::Reviews(self.list_submissions(&form.id).await?)),
            None => Ok(FormListing::NotProvisioned {
                available_forms: forms.into_iter().map(|f| f.name).collect(),
            }),
        }
    }

    /// Posts the review to the site the way the HTML form would.
    pub async fn submit(&self, review: &NewReview) -> Result<(), ApiError> {
        let site_url = self
            .site_url
            .as_deref()
            .ok_or(ApiError::NotConfigured("FORMS_SITE_URL is not set"))?;
        let fields = [
            ("form-name", self.form_name.as_str()),
            ("name", review.name.as_str()),
            ("movie-name", review.movie_name.as_str()),
            ("movie-review", review.movie_review.as_str()),
        ];
        let response = self
            .http
            .post(format!("{}/", site_url.trim_end_matches('/')))
            .form(&fields)
            .send()
            .await
            .map_err(|e| ApiError::FormsService(e.to_string()))?;
        check_status(response).await?;
        log!("[FORMS] Forwarded review of '{}'", review.movie_name);
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Response, ApiError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ApiError::FormsService(e.to_string()))?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::FormsService(format!(
        "{} {}",
        status,
        body.chars().take(200).collect::<String>()
    )))
}

fn select_form<'a>(forms: &'a [FormSummary], name: &str) -> Option<&'a FormSummary> {
    forms.iter().find(|form| form.name == name)
}

fn newest_first(mut submissions: Vec<FormSubmission>) -> Vec<ReviewView> {
    submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    submissions.into_iter().map(ReviewView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_are_a_configuration_error() {
        let config = FormsConfig {
            site_id: Some("site".into()),
            ..FormsConfig::default()
        };
        let err = FormsClient::from_config(&config).err().unwrap();
        assert!(matches!(err, ApiError::NotConfigured(_)));
    }

    #[test]
    fn submissions_map_to_views_newest_first() {
        let submissions: Vec<FormSubmission> = serde_json::from_str(
            r#"[
                {"id": "a", "number": 1, "created_at": "2024-01-02T10:00:00Z",
                 "data": {"name": "Ann", "movie-name": "Dune", "movie-review": "Great pacing", "ip": "1.2.3.4"}},
                {"id": "b", "number": 2, "created_at": "2024-02-05T10:00:00Z",
                 "data": {"name": "Bo", "movie-name": "Heat"}}
            ]"#,
        )
        .unwrap();

        let views = newest_first(submissions);
        assert_eq!(views[0].id, Some(2));
        assert_eq!(views[0].movie_review, "");
        assert_eq!(views[1].movie_name, "Dune");
        assert_eq!(views[1].submitted_at.as_deref(), Some("1/2/2024"));
    }

    #[test]
    fn form_is_selected_by_name() {
        let forms = vec![
            FormSummary {
                id: "1".into(),
                name: "contact".into(),
                submission_count: 3,
            },
            FormSummary {
                id: "2".into(),
                name: "movie-review".into(),
                submission_count: 0,
            },
        ];
        assert_eq!(select_form(&forms, "movie-review").map(|f| f.id.as_str()), Some("2"));
        assert!(select_form(&forms, "newsletter").is_none());
    }
}
