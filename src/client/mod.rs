//! Browser-side controller: submission lifecycle, writes, and list refresh.
pub mod controller;
pub mod dispatch;
pub mod http;
pub mod listing;

use crate::api::{LIST_PATH, SUBMIT_PATH};
use crate::config::DEFAULT_FORM_NAME;

/// Which hosting setup the bundle was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployTarget {
    /// Behind a host that captures plain form posts; writes go to both the
    /// forms collection and the database endpoint.
    Hosted,
    #[default]
    Local,
}

impl DeployTarget {
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(|f| f.trim().to_ascii_lowercase()) {
            Some(f) if f == "hosted" => DeployTarget::Hosted,
            _ => DeployTarget::Local,
        }
    }

    /// Reads `REVIEWS_DEPLOY_TARGET` at build time.
    pub fn from_build_env() -> Self {
        Self::from_flag(option_env!("REVIEWS_DEPLOY_TARGET"))
    }
}

/// Endpoints the controller talks to. Resolved once and shared through
/// Leptos context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub submit_endpoint: String,
    pub list_endpoint: String,
    pub forms_endpoint: Option<String>,
    pub form_name: String,
}

impl ClientConfig {
    pub fn for_target(target: DeployTarget) -> Self {
        let forms_endpoint = match target {
            DeployTarget::Hosted => Some("/".to_string()),
            DeployTarget::Local => None,
        };
        Self {
            submit_endpoint: SUBMIT_PATH.to_string(),
            list_endpoint: LIST_PATH.to_string(),
            forms_endpoint,
            form_name: DEFAULT_FORM_NAME.to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_target(DeployTarget::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_target_dual_writes() {
        let config = ClientConfig::for_target(DeployTarget::from_flag(Some("Hosted")));
        assert_eq!(config.forms_endpoint.as_deref(), Some("/"));
        assert_eq!(config.submit_endpoint, "/api/submit-review");
    }

    #[test]
    fn unknown_or_missing_flag_is_local() {
        assert_eq!(DeployTarget::from_flag(None), DeployTarget::Local);
        assert_eq!(DeployTarget::from_flag(Some("staging")), DeployTarget::Local);
        assert!(ClientConfig::default().forms_endpoint.is_none());
    }
}
