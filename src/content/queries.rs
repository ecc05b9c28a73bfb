//! Post queries
//!
//! The two read shapes the site is built from. `list_posts` and
//! `get_post_by_slug` are the fault boundary: backend failures are logged and
//! turned into an empty list or `None`, so callers see "no content" and
//! "backend unreachable" the same way. The `try_` variants hand the error back
//! for callers that prefer to fail fast.

use lazy_static::lazy_static;
use serde_json::Value;
use std::collections::HashSet;

use super::client::{ContentClient, ContentSource, QueryParams};
use super::error::Result;
use super::{is_valid_slug, Post};

/// Fields requested for every post
pub const POST_PROJECTION: &str = r#"{
  _id,
  title,
  "slug": slug.current,
  description,
  publishedAt,
  body,
  "coverImage": coverImage.asset->url
}"#;

/// Excludes everything under the drafts path
pub const NOT_DRAFT: &str = r#"!(_id in path("drafts.**"))"#;

lazy_static! {
    /// Every published post, newest first
    pub static ref ALL_POSTS_QUERY: String = format!(
        r#"*[_type == "post" && {}] | order(publishedAt desc) {}"#,
        NOT_DRAFT, POST_PROJECTION
    );

    /// First published post whose slug equals `$slug`
    pub static ref POST_BY_SLUG_QUERY: String = format!(
        r#"*[_type == "post" && slug.current == $slug && {}][0] {}"#,
        NOT_DRAFT, POST_PROJECTION
    );
}

/// Read-only post queries over a content source
pub struct PostQueries<S = ContentClient> {
    source: S,
}

impl<S: ContentSource> PostQueries<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// All published posts, newest first. Empty on any backend fault.
    pub async fn list_posts(&self) -> Vec<Post> {
        match self.try_list_posts().await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("Error fetching posts: {}", e);
                Vec::new()
            }
        }
    }

    /// The published post with `slug`. `None` when missing or on any backend fault.
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        match self.try_get_post_by_slug(slug).await {
            Ok(post) => post,
            Err(e) => {
                tracing::error!("Error fetching post {:?}: {}", slug, e);
                None
            }
        }
    }

    /// Like [`list_posts`](Self::list_posts) but surfaces backend faults
    pub async fn try_list_posts(&self) -> Result<Vec<Post>> {
        let value = self
            .source
            .fetch(&ALL_POSTS_QUERY, &QueryParams::new())
            .await?;
        decode_posts(value)
    }

    /// Like [`get_post_by_slug`](Self::get_post_by_slug) but surfaces backend faults
    pub async fn try_get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        if !is_valid_slug(slug) {
            tracing::debug!("Invalid slug {:?}, skipping lookup", slug);
            return Ok(None);
        }

        let mut params = QueryParams::new();
        params.insert("slug".to_string(), Value::String(slug.to_string()));

        let value = self.source.fetch(&POST_BY_SLUG_QUERY, &params).await?;
        let post: Option<Post> = serde_json::from_value(value)?;
        Ok(post.filter(|p| {
            let valid = p.has_valid_slug();
            if !valid {
                tracing::warn!("Skipping post {}: unsafe slug {:?}", p.id, p.slug);
            }
            valid
        }))
    }
}

/// Decode a list result record by record.
///
/// Records that do not fit the post shape or whose slug is not a single
/// URL-safe path segment are skipped, as are repeated slugs (the first one wins).
fn decode_posts(value: Value) -> Result<Vec<Post>> {
    let records: Option<Vec<Value>> = serde_json::from_value(value)?;
    let records = records.unwrap_or_default();

    let mut seen = HashSet::new();
    let mut posts = Vec::with_capacity(records.len());

    for record in records {
        let id = record
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();

        match serde_json::from_value::<Post>(record) {
            Ok(post) if !post.has_valid_slug() => {
                tracing::warn!("Skipping post {}: unsafe slug {:?}", id, post.slug);
            }
            Ok(post) => {
                if seen.insert(post.slug.clone()) {
                    posts.push(post);
                } else {
                    tracing::warn!("Skipping post {}: duplicate slug {:?}", id, post.slug);
                }
            }
            Err(e) => {
                tracing::warn!("Skipping post {}: {}", id, e);
            }
        }
    }

    Ok(posts)
}
