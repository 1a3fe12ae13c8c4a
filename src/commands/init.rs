//! Initialize a new blog directory

use anyhow::Result;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Inkpost Configuration

# Site
title: Inkpost
description: ''
url: http://localhost:4000
# IANA timezone for "Published at" dates; empty means UTC
timezone: ''

# Directory
public_dir: public

# Seconds a fetched post is served before it is fetched again
revalidate: 60

# Content store
# SANITY_PROJECT_ID, SANITY_DATASET, SANITY_API_VERSION and SANITY_API_TOKEN
# override these values; the token is only read from the environment.
sanity:
  project_id: ''
  dataset: production
  api_version: '2021-03-25'
"#;

/// Initialize a blog in the given directory
///
/// An existing `_config.yml` is left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("public"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::warn!("{:?} already exists, keeping it", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
    }

    Ok(())
}
