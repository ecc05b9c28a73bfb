//! Generate static files

use anyhow::{Context, Result};

use crate::generator::Generator;
use crate::Blog;

/// Fetch published posts and generate the site.
///
/// By default a backend fault degrades to an empty site. With `strict` the
/// fault aborts generation instead.
pub async fn run(blog: &Blog, strict: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let queries = blog.queries()?;
    let posts = if strict {
        queries
            .try_list_posts()
            .await
            .context("Failed to fetch posts")?
    } else {
        queries.list_posts().await
    };

    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(blog)?;
    generator.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
