#[cfg(feature = "ssr")]
mod db_impl {
    use crate::models::review::{NewReview, Review};
    use chrono::{DateTime, Utc};
    use leptos::logging::log;
    use rusqlite::types::Type;
    use rusqlite::{params, Connection, Row};
    use std::time::Duration;
    use thiserror::Error;

    /// How long a connection waits on a locked database before giving up.
    const BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

    const CREATE_REVIEWS_TABLE: &str = "CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) > 0),
            movie_name TEXT NOT NULL CHECK (length(movie_name) > 0),
            movie_review TEXT NOT NULL CHECK (length(movie_review) > 0),
            submitted_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );";

    #[derive(Debug, Error)]
    pub enum StoreError {
        #[error("review store unavailable: {0}")]
        Unavailable(#[source] rusqlite::Error),
        #[error("failed to write review: {0}")]
        WriteFailed(#[source] rusqlite::Error),
        #[error("failed to read reviews: {0}")]
        ReadFailed(#[source] rusqlite::Error),
    }


    /// One connection to the review store, opened per request and dropped
    /// when the request finishes. Calls block, so handlers run them on the
    /// blocking pool.
    #[derive(Debug)]
    pub struct Database {
        conn: Connection,
    }

    impl Database {
        /// Opens `url`, which is either a file path or a `sqlite:` URL.
        pub fn open(url: &str) -> Result<Self, StoreError> {
            let path = url
                .strip_prefix("sqlite://")
                .or_else(|| url.strip_prefix("sqlite:"))
                .unwrap_or(url);
            let conn = Connection::open(path).map_err(StoreError::Unavailable)?;
            conn.busy_timeout(BUSY_TIMEOUT)
                .map_err(StoreError::Unavailable)?;
            log!("[DB] Connection established at: {}", path);
            Ok(Database { conn })
        }

        /// Creates the reviews table if it does not exist yet.
        pub fn ensure_schema(&self) -> Result<(), StoreError> {
            self.conn.execute_batch(CREATE_REVIEWS_TABLE).map_err(|e| {
                log!("[DB] Failed creating reviews table: {}", e);
                StoreError::Unavailable(e)
            })
        }

        pub fn insert_review(&mut self, review: &NewReview) -> Result<Review, StoreError> {
            let tx = self.conn.transaction().map_err(StoreError::WriteFailed)?;

            tx.execute(
                "INSERT INTO reviews (name, movie_name, movie_review) VALUES (?, ?, ?)",
                params![&review.name, &review.movie_name, &review.movie_review],
            )
            .map_err(|e| {
                log!("[DB] Insert failed: {:?}", e);
                StoreError::WriteFailed(e)
            })?;
            let id = tx.last_insert_rowid();

            let stored = tx
                .query_row(
                    "SELECT id, name, movie_name, movie_review, submitted_at
                     FROM reviews WHERE id = ?",
                    [id],
                    review_from_row,
                )
                .map_err(StoreError::WriteFailed)?;
            tx.commit().map_err(StoreError::WriteFailed)?;

            log!("[DB] Stored review {} for '{}'", stored.id, stored.movie_name);
            Ok(stored)
        }

        /// All reviews, newest first.
        pub fn list_reviews(&self) -> Result<Vec<Review>, StoreError> {
            let mut stmt = self
                .conn
                .prepare(
                    "SELECT id, name, movie_name, movie_review, submitted_at
                     FROM reviews
                     ORDER BY submitted_at DESC, id DESC",
                )
                .map_err(StoreError::ReadFailed)?;
            let rows = stmt
                .query_map([], review_from_row)
                .map_err(StoreError::ReadFailed)?;

            let mut reviews = Vec::new();
            for row in rows {
                reviews.push(row.map_err(StoreError::ReadFailed)?);
            }
            log!("[DB] Fetched {} reviews", reviews.len());
            Ok(reviews)
        }
    }

    fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
        let submitted_at: String = row.get(4)?;
        let submitted_at = DateTime::parse_from_rfc3339(&submitted_at)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Review {
            id: row.get(0)?,
            name: row.get(1)?,
            movie_name: row.get(2)?,
            movie_review: row.get(3)?,
            submitted_at,
        })
    }
}

#[cfg(feature = "ssr")]
pub use db_impl::{Database, StoreError};
