//! List posts in the database

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::Post;
use crate::helpers::format_timestamp;
use crate::Blog;

/// Fetch published posts and print one line per post
pub async fn run(blog: &Blog) -> Result<()> {
    let posts = ContentLoader::new(blog).load_posts().await?;

    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("  {}", describe(blog, post));
    }

    Ok(())
}

fn describe(blog: &Blog, post: &Post) -> String {
    let created = format_timestamp(post.created_ts.as_deref(), "YYYY-MM-DD", blog.config.tz())
        .unwrap_or_else(|| "----------".to_string());
    format!(
        "{} - {} [{}] ({})",
        created,
        post.title.as_deref().unwrap_or("(untitled)"),
        post.slug.as_deref().unwrap_or("-"),
        post.id
    )
}
