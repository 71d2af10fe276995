//! Content loader - fetches records from the database and builds posts

use anyhow::{Context, Result};

use super::{Normalizer, Post};
use crate::notion::{NotionClient, PageSource};
use crate::Blog;

/// Loads posts from a page source
pub struct ContentLoader<'a> {
    blog: &'a Blog,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// Client for the configured database
    pub fn client(&self) -> Result<NotionClient> {
        NotionClient::new(&self.blog.config.notion).context("Failed to configure Notion client")
    }

    /// Load published posts from the configured database
    pub async fn load_posts(&self) -> Result<Vec<Post>> {
        let client = self.client()?;
        self.load_posts_from(&client).await
    }

    /// Load published posts from any page source, in source order
    pub async fn load_posts_from(&self, source: &dyn PageSource) -> Result<Vec<Post>> {
        let records = source
            .fetch_published()
            .await
            .context("Failed to query the Notion database")?;

        let posts = Normalizer::new(&self.blog.config.notion.properties).normalize(&records);
        tracing::debug!(
            "Normalized {} records into {} posts",
            records.len(),
            posts.len()
        );

        Ok(posts)
    }
}
