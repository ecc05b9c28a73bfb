//! URL helper functions

use url::Url;

use crate::config::SiteConfig;

/// Root-relative URL for a path, never with a trailing slash
///
/// # Examples
/// ```ignore
/// url_for("blog/hello/") // -> "/blog/hello"
/// url_for("")            // -> "/"
/// ```
pub fn url_for(path: &str) -> String {
    let path = path.trim_matches('/');
    format!("/{}", path)
}

/// Absolute URL on the canonical site, if a site URL is configured
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/hello") // -> Some("https://example.com/blog/hello")
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> Option<String> {
    let base = Url::parse(config.site_url()?).ok()?;
    base.join(&url_for(path)).ok().map(String::from)
}

/// Output file for a root-relative page path.
///
/// `/` maps to `index.html`; any other path `p` maps to `p.html`, which the
/// preview server and typical static hosts serve at `p`.
pub fn output_file(path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}.html", path)
    }
}
