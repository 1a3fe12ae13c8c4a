//! inkpost: a blog front end over a hosted content store
//!
//! Posts, authors and comments live in a Sanity dataset. This crate fetches
//! them, renders post pages from Portable Text, and writes reader comments
//! back as unapproved documents for moderation.

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod page;
pub mod render;
pub mod server;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use client::{ContentStore, SanityClient};

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Content store for reads and comment writes
    pub store: Arc<dyn ContentStore>,
}

impl Blog {
    /// Create a blog from a directory, reading `_config.yml` and the environment
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env(|key| std::env::var(key).ok());

        let store: Arc<dyn ContentStore> = Arc::new(SanityClient::new(&config.sanity)?);
        Ok(Self::with_store(base_dir, config, store))
    }

    /// Create a blog over an existing content store
    pub fn with_store<P: AsRef<Path>>(
        base_dir: P,
        config: config::SiteConfig,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
            store,
        }
    }

    /// Prerender every post page
    pub async fn generate(&self) -> Result<usize> {
        commands::generate::run(self).await
    }

    /// Remove prerendered pages
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
