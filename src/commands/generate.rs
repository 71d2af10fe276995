//! Generate static files

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::notion::PageSource;
use crate::Blog;

/// Fetch posts from the configured database and generate the site
pub async fn run(blog: &Blog) -> Result<()> {
    let client = ContentLoader::new(blog).client()?;
    run_with_source(blog, &client).await
}

/// Generate the site from any page source
pub async fn run_with_source(blog: &Blog, source: &dyn PageSource) -> Result<()> {
    let start = std::time::Instant::now();

    // A failed fetch aborts the whole build
    let posts = ContentLoader::new(blog).load_posts_from(source).await?;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(blog)?;
    generator.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
