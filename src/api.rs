#[cfg(feature = "ssr")]
use crate::{
    config::{AppConfig, Backend},
    db::{Database, StoreError},
    error::ApiError,
    forms::{FormListing, FormsClient},
    models::envelope::{EmptyState, SubmitResponse},
    models::review::{NewReview, ReviewSubmission, ReviewView},
};
#[cfg(feature = "ssr")]
use actix_web::{
    http::header::{self, CacheControl, CacheDirective},
    http::Method,
    web, HttpRequest, HttpResponse,
};
#[cfg(feature = "ssr")]
use futures::StreamExt;
#[cfg(feature = "ssr")]
use leptos::logging::{error, log};

pub const SUBMIT_PATH: &str = "/api/submit-review";
pub const LIST_PATH: &str = "/api/reviews";

/// Largest request body the write endpoint reads.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Registers both endpoints. They accept every method so that the handlers
/// answer wrong verbs with the JSON error envelope.
#[cfg(feature = "ssr")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(SUBMIT_PATH, web::route().to(submit_review))
        .route(LIST_PATH, web::route().to(list_reviews));
}

#[cfg(feature = "ssr")]
pub async fn submit_review(
    req: HttpRequest,
    payload: web::Payload,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    log!("[API] {} {}", req.method(), req.path());
    if req.method() != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let body = read_body(payload).await?;
    let submission = parse_submission(&req, &body)?;
    let review = submission.validate().map_err(|field| {
        log!("[API] Rejected submission, missing field: {}", field);
        ApiError::ValidationFailed(field)
    })?;

    let result = match config.backend {
        Backend::Database => save_to_database(&config, review).await,
        Backend::Forms => forward_to_forms(&config, review).await,
    };
    result.inspect_err(|e| error!("[API] Submission failed: {}", e))
}

#[cfg(feature = "ssr")]
pub async fn list_reviews(
    req: HttpRequest,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    log!("[API] {} {}", req.method(), req.path());
    if req.method() != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let result = match config.backend {
        Backend::Database => list_from_database(&config).await,
        Backend::Forms => list_from_forms(&config).await,
    };
    result.inspect_err(|e| error!("[API] Listing failed: {}", e))
}

#[cfg(feature = "ssr")]
async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut, ApiError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(ApiError::PayloadTooLarge(MAX_BODY_BYTES));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[cfg(feature = "ssr")]
fn parse_submission(req: &HttpRequest, body: &[u8]) -> Result<ReviewSubmission, ApiError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => {
            serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
        }
        "application/x-www-form-urlencoded" => {
            let body = std::str::from_utf8(body)
                .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
            web::Query::<ReviewSubmission>::from_query(body)
                .map(web::Query::into_inner)
                .map_err(|e| ApiError::MalformedBody(e.to_string()))
        }
        "" => Err(ApiError::UnsupportedMediaType("missing content type".to_string())),
        other => Err(ApiError::UnsupportedMediaType(other.to_string())),
    }
}

#[cfg(feature = "ssr")]
async fn save_to_database(config: &AppConfig, review: NewReview) -> Result<HttpResponse, ApiError> {
    let Some(url) = config.database_url.as_deref() else {
        log!("[API] Development mode, review of '{}' not persisted", review.movie_name);
        return Ok(HttpResponse::Ok().json(SubmitResponse::ok(
            "Review submitted successfully (development mode)",
            ReviewView::unsaved(&review),
        )));
    };

    let url = url.to_string();
    let stored = web::block(move || -> Result<_, StoreError> {
        let mut db = Database::open(&url)?;
        db.ensure_schema()?;
        db.insert_review(&review)
    })
    .await??;
    log!("[API] Saved review {}", stored.id);

    Ok(HttpResponse::Ok().json(SubmitResponse::ok(
        "Review submitted successfully",
        ReviewView::from(stored),
    )))
}

#[cfg(feature = "ssr")]
async fn forward_to_forms(config: &AppConfig, review: NewReview) -> Result<HttpResponse, ApiError> {
    let client = FormsClient::from_config(&config.forms)?;
    client.submit(&review).await?;
    Ok(HttpResponse::Ok().json(SubmitResponse::ok(
        "Review submitted successfully",
        ReviewView::unsaved(&review),
    )))
}

#[cfg(feature = "ssr")]
async fn list_from_database(config: &AppConfig) -> Result<HttpResponse, ApiError> {
    let Some(url) = config.database_url.as_deref() else {
        return Ok(no_cache().json(EmptyState::development()));
    };

    let url = url.to_string();
    let rows = web::block(move || -> Result<_, StoreError> {
        let db = Database::open(&url)?;
        db.ensure_schema()?;
        db.list_reviews()
    })
    .await??;
    let reviews: Vec<ReviewView> = rows
        .into_iter()
        .map(ReviewView::from)
        .collect();
    log!("[API] Returning {} reviews", reviews.len());
    Ok(no_cache().json(reviews))
}

#[cfg(feature = "ssr")]
async fn list_from_forms(config: &AppConfig) -> Result<HttpResponse, ApiError> {
    let client = FormsClient::from_config(&config.forms)?;
    match client.reviews().await? {
        FormListing::Reviews(reviews) => {
            log!("[API] Returning {} form submissions", reviews.len());
            Ok(no_cache().json(reviews))
        }
        FormListing::NotProvisioned { available_forms } => Ok(no_cache().json(
            EmptyState::no_submissions(client.form_name(), available_forms),
        )),
    }
}

#[cfg(feature = "ssr")]
fn no_cache() -> actix_web::HttpResponseBuilder {
    let mut builder = HttpResponse::Ok();
    builder.insert_header(CacheControl(vec![CacheDirective::NoCache]));
    builder
}
