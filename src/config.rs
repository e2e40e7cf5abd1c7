//! Environment configuration.
//!
//! Read after `dotenvy::dotenv()` so a local `.env` file can supply values.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Every variable [`Config`] reads.
pub const ENV_KEYS: &[&str] = &[
    "FIRESTORE_PROJECT_ID",
    "FIRESTORE_API_KEY",
    "FIRESTORE_BEARER_TOKEN",
    "FIRESTORE_BASE_URL",
    "FIRESTORE_PAGE_SIZE",
    "RATINGS_COLLECTION",
    "PROFESSORS_COLLECTION",
    "ANON_VIEW_LIMIT",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
    pub base_url: String,
    pub page_size: usize,
    pub ratings_collection: String,
    pub professors_collection: String,
    pub anon_view_limit: usize,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Only [`ENV_KEYS`] are read; unrelated variables, including ones that
    /// are not valid UTF-8, are never touched.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env_vars(|key| std::env::var(key).ok()))
    }

    /// Loads configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let text = |key: &str| vars.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let text_or = |key: &str, default: &str| text(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            project_id: text("FIRESTORE_PROJECT_ID"),
            api_key: text("FIRESTORE_API_KEY"),
            bearer_token: text("FIRESTORE_BEARER_TOKEN"),
            base_url: text_or("FIRESTORE_BASE_URL", DEFAULT_BASE_URL),
            page_size: parse_or(text("FIRESTORE_PAGE_SIZE"), "FIRESTORE_PAGE_SIZE", 300)?,
            ratings_collection: text_or("RATINGS_COLLECTION", "ratings"),
            professors_collection: text_or("PROFESSORS_COLLECTION", "professors"),
            anon_view_limit: parse_or(text("ANON_VIEW_LIMIT"), "ANON_VIEW_LIMIT", 3)?,
        })
    }

    /// The project id, required when reading from the hosted store.
    pub fn require_project_id(&self) -> Result<&str> {
        self.project_id
            .as_deref()
            .context("FIRESTORE_PROJECT_ID must be set to read from the hosted store")
    }
}

/// Collects [`ENV_KEYS`] through `lookup`, dropping unset keys.
fn env_vars(lookup: impl Fn(&str) -> Option<String>) -> HashMap<String, String> {
    ENV_KEYS
        .iter()
        .filter_map(|key| lookup(key).map(|value| (key.to_string(), value)))
        .collect()
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid {key} value '{raw}'")),
        None => {
            debug!(key, %default, "Not set, using default");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(HashMap::new()).unwrap();
        assert_eq!(config.project_id, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 300);
        assert_eq!(config.ratings_collection, "ratings");
        assert_eq!(config.professors_collection, "professors");
        assert_eq!(config.anon_view_limit, 3);
        assert!(config.require_project_id().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("FIRESTORE_PROJECT_ID", "cualprofe-prod"),
            ("FIRESTORE_API_KEY", "k"),
            ("FIRESTORE_PAGE_SIZE", "50"),
            ("RATINGS_COLLECTION", "calificaciones"),
            ("ANON_VIEW_LIMIT", "0"),
        ]))
        .unwrap();
        assert_eq!(config.require_project_id().unwrap(), "cualprofe-prod");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.ratings_collection, "calificaciones");
        assert_eq!(config.anon_view_limit, 0);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = Config::from_vars(vars(&[("FIRESTORE_BASE_URL", "  "), ("FIRESTORE_API_KEY", "")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let config = Config::from_vars(vars(&[
            ("PATH", "/usr/bin"),
            ("FIRESTORE_PAGE_SIZES", "not a number"),
            ("FIRESTORE_PROJECT_ID", "cualprofe-prod"),
        ]))
        .unwrap();
        assert_eq!(config.project_id.as_deref(), Some("cualprofe-prod"));
        assert_eq!(config.page_size, 300);
    }

    #[test]
    fn test_env_vars_only_asks_for_known_keys() {
        let asked = std::cell::RefCell::new(Vec::new());
        let collected = env_vars(|key| {
            asked.borrow_mut().push(key.to_string());
            (key == "ANON_VIEW_LIMIT").then(|| "5".to_string())
        });
        assert_eq!(*asked.borrow(), ENV_KEYS.to_vec());
        assert_eq!(collected.len(), 1);
        assert_eq!(Config::from_vars(collected).unwrap().anon_view_limit, 5);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = Config::from_vars(vars(&[("FIRESTORE_PAGE_SIZE", "many")])).unwrap_err();
        assert!(err.to_string().contains("FIRESTORE_PAGE_SIZE"));
    }
}
