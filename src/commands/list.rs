//! List published posts

use anyhow::Result;

use crate::content::Post;
use crate::Blog;

/// Print every published post, newest first
pub async fn run(blog: &Blog, json: bool) -> Result<()> {
    let posts = blog.queries()?.list_posts().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        print!("{}", format_posts(&posts));
    }

    Ok(())
}

fn format_posts(posts: &[Post]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for post in posts {
        let date = post
            .published_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| post.published_at.clone());
        out.push_str(&format!("  {} - {} [{}]\n", date, post.title, post.slug));
    }
    out
}
