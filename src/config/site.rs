//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable holding the backend project identifier
pub const PROJECT_ID_ENV: &str = "SANITY_PROJECT_ID";
/// Environment variable holding the backend dataset name
pub const DATASET_ENV: &str = "SANITY_DATASET";
/// Environment variable overriding the canonical site URL
pub const SITE_URL_ENV: &str = "SITE_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    /// Canonical base URL. Required for feed generation.
    pub url: Option<String>,
    pub blog_dir: String,
    pub feed_path: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    // Content backend
    #[serde(default)]
    pub content: ContentConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "25CollectiveCo Blog".to_string(),
            description: "Thoughts, updates, and explorations from the collective".to_string(),
            language: "en-us".to_string(),

            url: None,
            blog_dir: "blog".to_string(),
            feed_path: "rss.xml".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            content: ContentConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Fill in server-only values from the process environment.
    ///
    /// Backend identity is never read from `_config.yml`.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project_id) = non_empty(PROJECT_ID_ENV) {
            self.content.project_id = project_id;
        }
        if let Some(dataset) = non_empty(DATASET_ENV) {
            self.content.dataset = dataset;
        }
        if let Some(url) = non_empty(SITE_URL_ENV) {
            tracing::debug!("Site URL overridden from {}", SITE_URL_ENV);
            self.url = Some(url);
        }
    }

    /// Site URL, if configured and non-blank
    pub fn site_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Path of a post relative to the site root, without trailing slash
    pub fn post_path(&self, slug: &str) -> String {
        let blog_dir = self.blog_dir.trim_matches('/');
        if blog_dir.is_empty() {
            format!("/{}", slug)
        } else {
            format!("/{}/{}", blog_dir, slug)
        }
    }
}

/// Content backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Backend project identifier (from `SANITY_PROJECT_ID` only)
    #[serde(skip)]
    pub project_id: String,
    /// Dataset name (from `SANITY_DATASET` only)
    #[serde(skip)]
    pub dataset: String,
    pub api_version: String,
    /// Read through the caching edge network instead of the live API
    pub use_cdn: bool,
    /// Override for the API host, e.g. a proxy or a local test backend
    pub api_host: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            api_host: None,
        }
    }
}
