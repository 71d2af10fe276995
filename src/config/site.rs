//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the Notion integration token
pub const TOKEN_ENV: &str = "NOTION_TOKEN";

/// Environment variable holding the Notion database id
pub const DATABASE_ID_ENV: &str = "NOTION_DATABASE_ID";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    // Date / Time format
    pub date_format: String,
    #[serde(default)]
    pub labels: LabelsConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    // Content source
    #[serde(default)]
    pub notion: NotionConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Notion Blog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "ja".to_string(),
            timezone: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            date_format: "YYYY-MM-DD HH:mm:ss".to_string(),
            labels: LabelsConfig::default(),

            highlight: HighlightConfig::default(),

            notion: NotionConfig::default(),
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

    /// Apply `NOTION_TOKEN` / `NOTION_DATABASE_ID` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(TOKEN_ENV).ok(),
            std::env::var(DATABASE_ID_ENV).ok(),
        );
    }

    /// Override the credential and database id when values are present and non-empty
    pub fn apply_overrides(&mut self, token: Option<String>, database_id: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            tracing::debug!("Using Notion token from {}", TOKEN_ENV);
            self.notion.token = token;
        }
        if let Some(id) = database_id.filter(|id| !id.trim().is_empty()) {
            tracing::debug!("Using database id from {}", DATABASE_ID_ENV);
            self.notion.database_id = id;
        }
    }

    /// Parsed display timezone, `None` means UTC
    pub fn tz(&self) -> Option<chrono_tz::Tz> {
        if self.timezone.trim().is_empty() {
            return None;
        }
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, falling back to UTC", self.timezone);
                None
            }
        }
    }
}

/// Labels shown next to post timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub created: String,
    pub updated: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            created: "作成日時".to_string(),
            updated: "更新日時".to_string(),
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Notion database connection
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
    pub base_url: String,
    pub version: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub properties: PropertyNames,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            database_id: String::new(),
            base_url: "https://api.notion.com".to_string(),
            version: "2022-06-28".to_string(),
            timeout_secs: 30,
            properties: PropertyNames::default(),
        }
    }
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("database_id", &self.database_id)
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("timeout_secs", &self.timeout_secs)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Names of the database properties the blog reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyNames {
    /// Title-kind property holding the post title
    pub title: String,
    /// Rich-text property holding the URL slug
    pub slug: String,
    /// Checkbox property gating publication
    pub published: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            slug: "Slug".to_string(),
            published: "Published".to_string(),
        }
    }
}
