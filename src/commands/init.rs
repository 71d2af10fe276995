//! Initialize a new blog directory

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

/// Default configuration written by `init`
const CONFIG_TEMPLATE: &str = r#"# notion-blog configuration

# Site
title: Notion Blog
description: ''
author: ''
language: ja
timezone: Asia/Tokyo

# URL
url: http://example.com
root: /

# Directory
public_dir: public
static_dir: static

# Date / Time format (Moment.js tokens)
date_format: YYYY-MM-DD HH:mm:ss
labels:
  created: 作成日時
  updated: 更新日時

# Code highlighting (syntect theme name)
highlight:
  theme: base16-ocean.dark
  line_number: false

# Notion database
# The token and database id are usually supplied through the
# NOTION_TOKEN and NOTION_DATABASE_ID environment variables.
notion:
  token: ''
  database_id: ''
  version: '2022-06-28'
  timeout_secs: 30
  properties:
    title: Name
    slug: Slug
    published: Published
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    tracing::debug!("Wrote {:?}", config_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_site() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("blog");

        init_site(&target).unwrap();

        assert!(target.join("static").is_dir());
        let config = SiteConfig::load(target.join("_config.yml")).unwrap();
        assert_eq!(config.timezone, "Asia/Tokyo");
        assert_eq!(config.notion.properties.published, "Published");
        assert!(config.notion.token.is_empty());
    }

    #[test]
    fn test_init_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: x\n").unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
