//! Initialize a new blog site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Site
title: 25CollectiveCo Blog
description: Thoughts, updates, and explorations from the collective
language: en-us

# URL
## Canonical base URL, required for the RSS feed. SITE_URL overrides it.
url: https://example.com
blog_dir: blog
feed_path: rss.xml

# Directory
public_dir: public
static_dir: static

# Content backend
## The project id and dataset are read from SANITY_PROJECT_ID and
## SANITY_DATASET (environment or .env), never from this file.
content:
  api_version: "2024-01-01"
  use_cdn: true
"#;

const ENV_TEMPLATE: &str = r#"# Server-only settings. Copy to .env and fill in.
SANITY_PROJECT_ID=
SANITY_DATASET=production
"#;

const STYLES_TEMPLATE: &str = r#"body {
  margin: 0 auto;
  max-width: 42rem;
  padding: 1rem;
  font-family: system-ui, sans-serif;
  line-height: 1.6;
}

.site-header {
  display: flex;
  justify-content: space-between;
  align-items: baseline;
}

.post-list {
  list-style: none;
  padding: 0;
}

.post-card img,
.post .cover {
  max-width: 100%;
}

.post-nav {
  display: flex;
  justify-content: space-between;
}
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        bail!("{:?} already contains a _config.yml", target_dir);
    }

    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    fs::write(target_dir.join(".env.example"), ENV_TEMPLATE)?;
    fs::write(target_dir.join("static/styles.css"), STYLES_TEMPLATE)?;

    let gitignore = target_dir.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, "public/\n.env\n")?;
    }

    tracing::debug!("Created site skeleton in {:?}", target_dir);
    Ok(())
}
