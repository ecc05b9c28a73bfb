//! Post model as projected by the content queries

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

lazy_static! {
    /// One URL path segment of unreserved or percent-encoded characters
    static ref SLUG_RE: Regex = Regex::new(r"^(?:[A-Za-z0-9._~-]|%[0-9A-Fa-f]{2})+$").unwrap();
}

/// Whether `slug` can be used as a single page path segment and file name
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug) && !slug.contains("..")
}

/// A published blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Backend document id. Opaque, never part of a site URL.
    #[serde(rename = "_id")]
    pub id: String,

    /// Post title
    pub title: String,

    /// URL-safe identifier, unique among published posts
    pub slug: String,

    /// Optional summary
    #[serde(default)]
    pub description: Option<String>,

    /// Publication timestamp (ISO 8601)
    #[serde(rename = "publishedAt")]
    pub published_at: String,

    /// Rich content blocks, owned by the backend
    #[serde(default)]
    pub body: Body,

    /// Cover image URL resolved by the backend
    #[serde(rename = "coverImage", default)]
    pub cover_image: Option<String>,
}

impl Post {
    /// Parse `published_at`.
    ///
    /// Accepts RFC 3339 timestamps, bare dates (midnight UTC) and
    /// offset-less date-times (taken as UTC).
    pub fn published_date(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.published_at)
    }

    /// Whether the slug is safe to use in page paths
    pub fn has_valid_slug(&self) -> bool {
        is_valid_slug(&self.slug)
    }

    /// Description, or the empty string when absent
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Get the newer neighbour in a list ordered newest first
    pub fn newer<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the older neighbour in a list ordered newest first
    pub fn older<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}

/// Opaque sequence of rich-content blocks.
///
/// The query layer passes it through untouched; `null` and a missing field
/// both decode to an empty body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Body(Vec<Value>);

impl Body {
    pub fn new(blocks: Vec<Value>) -> Self {
        Self(blocks)
    }

    pub fn blocks(&self) -> &[Value] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'de> Deserialize<'de> for Body {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let blocks = Option::<Vec<Value>>::deserialize(deserializer)?;
        Ok(Self(blocks.unwrap_or_default()))
    }
}

/// Parse an ISO 8601 timestamp as the backend stores them
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(slug: &str) -> Post {
        serde_json::from_value(json!({
            "_id": format!("id-{}", slug),
            "title": slug.to_uppercase(),
            "slug": slug,
            "publishedAt": "2024-01-01",
        }))
        .unwrap()
    }

    #[test]
    fn test_slug_validation() {
        for slug in ["hello-world", "v1.2", "caf%C3%A9", "a_b~c"] {
            assert!(is_valid_slug(slug), "rejected {:?}", slug);
        }
        for slug in ["", "..", "../../escaped", "a/b", "a..b", "x\"y", "has space", "%zz", "über"] {
            assert!(!is_valid_slug(slug), "accepted {:?}", slug);
        }
        assert!(post("hello").has_valid_slug());
    }

    #[test]
    fn test_decode_projected_post() {
        let post: Post = serde_json::from_value(json!({
            "_id": "abc",
            "title": "Hello",
            "slug": "hello",
            "description": null,
            "publishedAt": "2024-03-01T09:30:00Z",
            "body": [{"_type": "block", "children": []}],
            "coverImage": "https://cdn.example.com/cover.jpg"
        }))
        .unwrap();

        assert_eq!(post.id, "abc");
        assert_eq!(post.slug, "hello");
        assert_eq!(post.description, None);
        assert_eq!(post.body.len(), 1);
        assert_eq!(
            post.cover_image.as_deref(),
            Some("https://cdn.example.com/cover.jpg")
        );
    }

    #[test]
    fn test_null_body_is_empty() {
        let post: Post = serde_json::from_value(json!({
            "_id": "abc",
            "title": "Hello",
            "slug": "hello",
            "publishedAt": "2024-03-01",
            "body": null
        }))
        .unwrap();
        assert!(post.body.is_empty());
        assert_eq!(post.description_or_empty(), "");
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let result: Result<Post, _> = serde_json::from_value(json!({
            "_id": "abc",
            "title": null,
            "slug": "hello",
            "publishedAt": "2024-03-01"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_with_backend_names() {
        let value = serde_json::to_value(post("a")).unwrap();
        assert_eq!(value["_id"], "id-a");
        assert_eq!(value["publishedAt"], "2024-01-01");
        assert_eq!(value["body"], json!([]));
    }

    #[test]
    fn test_parse_timestamp() {
        let date = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let dt = parse_timestamp("2024-03-01T09:30:00.000Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T09:30:00+00:00");

        let offset = parse_timestamp("2024-03-01T09:30:00+02:00").unwrap();
        assert_eq!(offset.offset().local_minus_utc(), 2 * 3600);

        let naive = parse_timestamp("2024-03-01T09:30:00").unwrap();
        assert_eq!(naive.to_rfc3339(), "2024-03-01T09:30:00+00:00");

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_neighbours() {
        let posts = vec![post("c"), post("b"), post("a")];
        assert_eq!(posts[1].newer(&posts).map(|p| p.slug.as_str()), Some("c"));
        assert_eq!(posts[1].older(&posts).map(|p| p.slug.as_str()), Some("a"));
        assert!(posts[0].newer(&posts).is_none());
        assert!(posts[2].older(&posts).is_none());
    }
}
