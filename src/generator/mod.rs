//! Generator module - writes the static site using built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::Datelike;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{html_escape, ContentRenderer, Post};
use crate::helpers::{date_xml, format_timestamp, full_url_for, parse_timestamp, url_for};
use crate::templates::{ConfigData, NavPost, PostData, TemplateRenderer, STYLE_CSS};
use crate::Blog;

/// Directory under the public dir holding one page per post
const POSTS_DIR: &str = "posts";

/// Number of entries in the Atom feed
const FEED_LIMIT: usize = 20;

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    content: ContentRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let content = ContentRenderer::new(&blog.config.highlight);

        Ok(Self {
            blog: blog.clone(),
            renderer,
            content,
        })
    }

    /// Generate the entire site. Posts are rendered in the order given.
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        // Ensure public directory exists
        fs::create_dir_all(&self.blog.public_dir)?;

        // Copy static assets (images, etc.)
        self.copy_static_assets()?;
        self.write_file(&self.blog.public_dir.join("css/style.css"), STYLE_CSS)?;

        let post_data = self.build_post_data(posts);
        let config_data = self.build_config_data();

        self.generate_index_page(&post_data, &config_data)?;
        self.generate_post_pages(&post_data, &config_data)?;
        self.generate_atom_feed(posts, &post_data)?;
        self.generate_posts_json(posts)?;

        Ok(())
    }

    /// Build template data for every post
    fn build_post_data(&self, posts: &[Post]) -> Vec<PostData> {
        let config = &self.blog.config;
        let tz = config.tz();
        let segments = assign_segments(posts);

        posts
            .iter()
            .zip(segments)
            .map(|(post, segment)| {
                let path = url_for(config, &format!("{}/{}/", POSTS_DIR, segment));
                PostData {
                    id: html_escape(&post.id),
                    title: html_escape(post.title.as_deref().unwrap_or_default()),
                    slug: post.slug.clone(),
                    permalink: full_url_for(config, &path),
                    path,
                    created: format_timestamp(post.created_ts.as_deref(), &config.date_format, tz),
                    updated: format_timestamp(
                        post.last_edited_ts.as_deref(),
                        &config.date_format,
                        tz,
                    ),
                    created_iso: post.created_ts.clone(),
                    updated_iso: post.last_edited_ts.clone(),
                    content: self.content.render(&post.contents),
                }
            })
            .collect()
    }

    /// Build config data for templates
    fn build_config_data(&self) -> ConfigData {
        let config = &self.blog.config;
        ConfigData {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: url_for(config, ""),
            labels: config.labels.clone(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, config_data: &ConfigData) -> Context {
        let mut context = Context::new();
        context.insert("config", config_data);
        let now = chrono::Utc::now();
        let year = match self.blog.config.tz() {
            Some(tz) => now.with_timezone(&tz).year(),
            None => now.year(),
        };
        context.insert("current_year", &year.to_string());
        context
    }

    /// Generate the home page listing every post in full
    fn generate_index_page(&self, posts: &[PostData], config_data: &ConfigData) -> Result<()> {
        let mut context = self.create_base_context(config_data);
        context.insert("posts", posts);

        let html = self.renderer.render("index.html", &context)?;
        self.write_file(&self.blog.public_dir.join("index.html"), &html)?;
        tracing::debug!("Generated index with {} posts", posts.len());

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[PostData], config_data: &ConfigData) -> Result<()> {
        for (i, post) in posts.iter().enumerate() {
            // Posts are newest first
            let newer = i.checked_sub(1).map(|j| nav_post(&posts[j]));
            let older = posts.get(i + 1).map(nav_post);

            let mut context = self.create_base_context(config_data);
            context.insert("post", post);
            if let Some(ref newer) = newer {
                context.insert("newer", newer);
            }
            if let Some(ref older) = older {
                context.insert("older", older);
            }

            let html = self.renderer.render("post.html", &context)?;

            let relative = post
                .path
                .strip_prefix(&url_for(&self.blog.config, ""))
                .unwrap_or(&post.path);
            let output_path = self.blog.public_dir.join(relative).join("index.html");
            self.write_file(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    /// Generate Atom feed
    fn generate_atom_feed(&self, posts: &[Post], post_data: &[PostData]) -> Result<()> {
        let config = &self.blog.config;
        let updated = posts
            .iter()
            .filter_map(|p| p.last_edited_ts.as_deref().and_then(parse_timestamp))
            .max()
            .map(|d| date_xml(&d))
            .unwrap_or_else(|| date_xml(&chrono::Utc::now()));

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            full_url_for(config, "atom.xml")
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", full_url_for(config, "")));
        feed.push_str(&format!("  <updated>{}</updated>\n", updated));
        feed.push_str(&format!("  <id>{}</id>\n", full_url_for(config, "")));
        if !config.author.is_empty() {
            feed.push_str(&format!(
                "  <author><name>{}</name></author>\n",
                escape_xml(&config.author)
            ));
        }

        for (post, data) in posts.iter().zip(post_data).take(FEED_LIMIT) {
            let title = post.title.as_deref().unwrap_or(&post.id);
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", data.permalink));
            feed.push_str(&format!(
                "    <id>urn:notion:{}</id>\n",
                escape_xml(&post.id)
            ));
            if let Some(published) = post.created_ts.as_deref().and_then(parse_timestamp) {
                feed.push_str(&format!(
                    "    <published>{}</published>\n",
                    date_xml(&published)
                ));
            }
            if let Some(edited) = post
                .last_edited_ts
                .as_deref()
                .or(post.created_ts.as_deref())
                .and_then(parse_timestamp)
            {
                feed.push_str(&format!("    <updated>{}</updated>\n", date_xml(&edited)));
            }
            if !data.content.is_empty() {
                feed.push_str(&format!(
                    "    <content type=\"html\">{}</content>\n",
                    escape_xml(&data.content)
                ));
            }
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        self.write_file(&self.blog.public_dir.join("atom.xml"), &feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Write the normalized posts as JSON
    fn generate_posts_json(&self, posts: &[Post]) -> Result<()> {
        let json = serde_json::to_string_pretty(posts)?;
        self.write_file(&self.blog.public_dir.join("posts.json"), &json)?;
        tracing::info!("Generated posts.json");

        Ok(())
    }

    /// Copy static assets to public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }
}

/// Pick a unique URL segment per post: the slugified slug, or the
/// slugified id when the slug is missing, empty after slugifying, or already
/// taken. A numeric suffix is appended while the segment is still in use.
fn assign_segments(posts: &[Post]) -> Vec<String> {
    let mut used = HashSet::new();

    posts
        .iter()
        .map(|post| {
            let candidate = post
                .slug
                .as_deref()
                .map(slug::slugify)
                .filter(|s| !s.is_empty() && !used.contains(s));

            let base = match candidate {
                Some(segment) => segment,
                None => {
                    if post.slug.is_some() {
                        tracing::warn!(
                            "Slug {:?} of post {} is unusable, using its id",
                            post.slug,
                            post.id
                        );
                    }
                    match slug::slugify(&post.id) {
                        id if id.is_empty() => "post".to_string(),
                        id => id,
                    }
                }
            };

            let mut segment = base.clone();
            let mut n = 2;
            while used.contains(&segment) {
                segment = format!("{}-{}", base, n);
                n += 1;
            }
            used.insert(segment.clone());
            segment
        })
        .collect()
}

fn nav_post(post: &PostData) -> NavPost {
    NavPost {
        title: post.title.clone(),
        path: post.path.clone(),
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
