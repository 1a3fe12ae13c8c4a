//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub url: String,
    /// IANA timezone used for "Published at" dates; empty means UTC
    pub timezone: String,

    // Directory
    pub public_dir: String,

    /// Seconds a fetched post stays fresh before the next request re-fetches it
    pub revalidate: u64,

    // Content store
    #[serde(default)]
    pub sanity: SanityConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Inkpost".to_string(),
            description: String::new(),
            url: "http://localhost:4000".to_string(),
            timezone: String::new(),

            public_dir: "public".to_string(),

            revalidate: 60,

            sanity: SanityConfig::default(),
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

    /// Apply environment overrides on top of the file values.
    ///
    /// `lookup` is `std::env::var` in the binary and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let sanity = &mut self.sanity;

        if let Some(project_id) = lookup("SANITY_PROJECT_ID") {
            sanity.project_id = project_id;
        }
        if let Some(dataset) = lookup("SANITY_DATASET") {
            sanity.dataset = dataset;
        }
        if let Some(api_version) = lookup("SANITY_API_VERSION") {
            sanity.api_version = api_version;
        }
        if let Some(token) = lookup("SANITY_API_TOKEN").filter(|t| !t.is_empty()) {
            sanity.token = Some(token);
        }

        if sanity.use_cdn.is_none() {
            let production = lookup("BLOG_ENV").is_some_and(|env| env == "production");
            sanity.use_cdn = Some(production);
        }

        tracing::debug!(
            "Content store: project={} dataset={} cdn={:?}",
            sanity.project_id,
            sanity.dataset,
            sanity.use_cdn
        );
    }
}

/// Sanity project configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Read through the API CDN; resolved from `BLOG_ENV` when unset
    pub use_cdn: Option<bool>,
    /// Write-capable token, only needed where comments are created
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2021-03-25".to_string(),
            use_cdn: None,
            token: None,
        }
    }
}

impl fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
