use leptos::logging::{log, warn};
use std::env;

pub const DEFAULT_FORMS_API_BASE: &str = "https://api.netlify.com/api/v1";
pub const DEFAULT_FORM_NAME: &str = "movie-review";

/// Where accepted reviews are written and listed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Database,
    Forms,
}

impl Backend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Some(Backend::Database),
            "forms" => Some(Backend::Forms),
            _ => None,
        }
    }
}

/// Server configuration, resolved once at startup and shared with every
/// request handler.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub backend: Backend,
    /// Absent means development mode: nothing is persisted.
    pub database_url: Option<String>,
    pub forms: FormsConfig,
}

#[derive(Debug, Clone)]
pub struct FormsConfig {
    pub api_base: String,
    pub site_id: Option<String>,
    pub access_token: Option<String>,
    pub site_url: Option<String>,
    pub form_name: String,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_FORMS_API_BASE.to_string(),
            site_id: None,
            access_token: None,
            site_url: None,
            form_name: DEFAULT_FORM_NAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match var("REVIEW_BACKEND") {
            Some(value) => Backend::parse(&value).unwrap_or_else(|| {
                warn!("Invalid REVIEW_BACKEND value '{value}', using database");
                Backend::Database
            }),
            None => Backend::Database,
        };

        let database_url = var("DATABASE_URL");
        if backend == Backend::Database && database_url.is_none() {
            log!("DATABASE_URL not set, running in development mode");
        }

        let forms = FormsConfig {
            api_base: var("FORMS_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_FORMS_API_BASE.to_string()),
            site_id: var("FORMS_SITE_ID"),
            access_token: var("FORMS_ACCESS_TOKEN"),
            site_url: var("FORMS_SITE_URL"),
            form_name: var("FORM_NAME").unwrap_or_else(|| DEFAULT_FORM_NAME.to_string()),
        };

        Self {
            backend,
            database_url,
            forms,
        }
    }

    pub fn with_database(url: impl Into<String>) -> Self {
        Self {
            database_url: Some(url.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_database_development_mode() {
        let config = config_from(&[]);
        assert_eq!(config.backend, Backend::Database);
        assert!(config.database_url.is_none());
        assert_eq!(config.forms.form_name, DEFAULT_FORM_NAME);
        assert_eq!(config.forms.api_base, DEFAULT_FORMS_API_BASE);
    }

    #[test]
    fn reads_forms_settings() {
        let config = config_from(&[
            ("REVIEW_BACKEND", "Forms"),
            ("FORMS_SITE_ID", "site-1"),
            ("FORMS_ACCESS_TOKEN", "secret"),
            ("FORMS_API_BASE", "http://localhost:9000/api/"),
        ]);
        assert_eq!(config.backend, Backend::Forms);
        assert_eq!(config.forms.site_id.as_deref(), Some("site-1"));
        assert_eq!(config.forms.api_base, "http://localhost:9000/api");
    }

    #[test]
    fn unknown_backend_and_blank_values_fall_back() {
        let config = config_from(&[("REVIEW_BACKEND", "redis"), ("DATABASE_URL", "  ")]);
        assert_eq!(config.backend, Backend::Database);
        assert!(config.database_url.is_none());
    }
}
