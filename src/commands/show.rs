//! Show a single post by slug

use anyhow::{bail, Result};

use crate::content::Post;
use crate::Blog;

/// Print the published post with `slug`
pub async fn run(blog: &Blog, slug: &str, json: bool) -> Result<()> {
    let Some(post) = blog.queries()?.get_post_by_slug(slug).await else {
        bail!("No published post with slug {:?}", slug);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
    } else {
        print!("{}", format_post(blog, &post));
    }

    Ok(())
}

fn format_post(blog: &Blog, post: &Post) -> String {
    let mut out = format!("{}\n", post.title);
    out.push_str(&format!("  path:      {}\n", blog.config.post_path(&post.slug)));
    out.push_str(&format!("  published: {}\n", post.published_at));
    if let Some(description) = &post.description {
        out.push_str(&format!("  summary:   {}\n", description));
    }
    if let Some(cover) = &post.cover_image {
        out.push_str(&format!("  cover:     {}\n", cover));
    }
    out.push_str(&format!("  blocks:    {}\n", post.body.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::{stored_post, MockLake};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_show_missing_post_fails() {
        let lake = MockLake::start(vec![stored_post("drafts.x", "x", "2024-01-01")]).await;
        let dir = TempDir::new().unwrap();
        let mut blog = Blog::new(dir.path()).unwrap();
        blog.config.content = lake.config();

        assert!(run(&blog, "x", false).await.is_err());
        assert!(run(&blog, "x", true).await.is_err());
    }

    #[test]
    fn test_format_post() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let post: Post = serde_json::from_value(serde_json::json!({
            "_id": "1",
            "title": "Hello",
            "slug": "hello",
            "description": "Hi there",
            "publishedAt": "2024-01-01"
        }))
        .unwrap();

        let out = format_post(&blog, &post);
        assert!(out.starts_with("Hello\n"));
        assert!(out.contains("path:      /blog/hello\n"));
        assert!(out.contains("summary:   Hi there\n"));
        assert!(!out.contains("cover:"));
    }
}
