//! Built-in templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Autoescaping is off;
//! text fields are escaped before they reach the context.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::LabelsConfig;

/// Stylesheet written to `css/style.css`
pub const STYLE_CSS: &str = include_str!("default/style.css");

/// Template renderer with the embedded default theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("index.html", include_str!("default/index.html")),
            ("post.html", include_str!("default/post.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("default/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("default/partials/footer.html"),
            ),
            (
                "partials/article.html",
                include_str!("default/partials/article.html"),
            ),
        ])?;

        // Register custom filters
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub id: String,
    /// HTML-escaped title
    pub title: String,
    pub slug: Option<String>,
    /// Site-relative URL of the post page
    pub path: String,
    pub permalink: String,
    /// Display timestamps
    pub created: Option<String>,
    pub updated: Option<String>,
    /// Timestamps as returned by the API
    pub created_iso: Option<String>,
    pub updated_iso: Option<String>,
    /// Rendered body HTML
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
    pub labels: LabelsConfig,
}
