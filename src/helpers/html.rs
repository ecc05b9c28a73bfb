//! HTML helper functions

use super::url::url_for;
use crate::config::SiteConfig;

/// Generate the feed link tag for the page head
///
/// # Examples
/// ```ignore
/// feed_tag(&config) // -> <link rel="alternate" type="application/rss+xml" href="/rss.xml" title="...">
/// ```
pub fn feed_tag(config: &SiteConfig) -> String {
    format!(
        r#"<link rel="alternate" type="application/rss+xml" href="{}" title="{}">"#,
        html_escape(&url_for(&config.feed_path)),
        html_escape(&config.title)
    )
}

/// Generate a meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="collective-blog {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
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

    result
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
