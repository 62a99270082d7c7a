// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review row as the store holds it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i64,                     // Assigned by the store, increasing
    pub name: String,                // Who wrote the review
    pub movie_name: String,          // Movie being reviewed
    pub movie_review: String,        // Free-form review text
    pub submitted_at: DateTime<Utc>, // Assigned by the store at insertion
}

/// Display shape sent to the browser by both endpoints.
///
/// `id` and `submitted_at` are absent when a submission was accepted without
/// being persisted (development mode, or forwarded to the forms collection).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub movie_name: String,
    pub movie_review: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

impl ReviewView {
    /// View of a submission that has not been stored anywhere we can read back.
    pub fn unsaved(review: &NewReview) -> Self {
        Self {
            id: None,
            name: review.name.clone(),
            movie_name: review.movie_name.clone(),
            movie_review: review.movie_review.clone(),
            submitted_at: None,
        }
    }
}

impl From<Review> for ReviewView {
    fn from(review: Review) -> Self {
        Self {
            id: Some(review.id),
            name: review.name,
            movie_name: review.movie_name,
            movie_review: review.movie_review,
            submitted_at: Some(format_submitted_at(&review.submitted_at)),
        }
    }
}

/// Formats a timestamp the way the listing page shows dates (`M/D/YYYY`).
pub fn format_submitted_at(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// Raw form payload. Keys match the HTML form field names.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ReviewSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "movie-name")]
    pub movie_name: Option<String>,
    #[serde(default, rename = "movie-review")]
    pub movie_review: Option<String>,
}

/// A submission that passed validation. All fields are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub name: String,
    pub movie_name: String,
    pub movie_review: String,
}

impl ReviewSubmission {
    pub fn new(name: &str, movie_name: &str, movie_review: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            movie_name: Some(movie_name.to_string()),
            movie_review: Some(movie_review.to_string()),
        }
    }

    /// Checks the three required fields in form order. The error names the
    /// first missing or blank field by its form key.
    pub fn validate(&self) -> Result<NewReview, &'static str> {
        let name = required(&self.name, "name")?;
        let movie_name = required(&self.movie_name, "movie-name")?;
        let movie_review = required(&self.movie_review, "movie-review")?;
        Ok(NewReview {
            name,
            movie_name,
            movie_review,
        })
    }

    /// Key/value pairs in the order the form posts them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone().unwrap_or_default()),
            ("movie-name", self.movie_name.clone().unwrap_or_default()),
            ("movie-review", self.movie_review.clone().unwrap_or_default()),
        ]
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, &'static str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn validate_trims_and_accepts() {
        let submission = ReviewSubmission::new("  Ann ", "Dune", "Great pacing\n");
        let review = submission.validate().unwrap();
        assert_eq!(review.name, "Ann");
        assert_eq!(review.movie_review, "Great pacing");
    }

    #[test]
    fn validate_names_first_missing_field() {
        let mut submission = ReviewSubmission::new("", "Dune", "x");
        assert_eq!(submission.validate(), Err("name"));

        submission.name = Some("Ann".into());
        submission.movie_review = None;
        assert_eq!(submission.validate(), Err("movie-review"));

        submission.movie_name = Some("   ".into());
        assert_eq!(submission.validate(), Err("movie-name"));
    }

    #[test]
    fn hyphenated_keys_deserialize() {
        let submission: ReviewSubmission = serde_json::from_str(
            r#"{"name":"Ann","movie-name":"Dune","movie-review":"Great pacing"}"#,
        )
        .unwrap();
        assert_eq!(submission.movie_name.as_deref(), Some("Dune"));
    }

    #[test]
    fn view_uses_display_field_names() {
        let review = Review {
            id: 7,
            name: "Ann".into(),
            movie_name: "Dune".into(),
            movie_review: "Great pacing".into(),
            submitted_at: Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap(),
        };
        let json = serde_json::to_value(ReviewView::from(review)).unwrap();
        assert_eq!(json["movieName"], "Dune");
        assert_eq!(json["movieReview"], "Great pacing");
        assert_eq!(json["submittedAt"], "3/9/2024");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn unsaved_view_omits_server_fields() {
        let review = ReviewSubmission::new("Ann", "Dune", "ok").validate().unwrap();
        let json = serde_json::to_value(ReviewView::unsaved(&review)).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("submittedAt").is_none());
    }
}
