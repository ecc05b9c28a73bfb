//! RSS 2.0 feed generation

use rss::validation::Validate;
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use thiserror::Error;
use url::Url;

use crate::config::SiteConfig;
use crate::content::Post;

/// RFC 822 date with a zero-padded day, as feed readers commonly expect
const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Feed generation error
#[derive(Debug, Error)]
pub enum FeedError {
    /// The canonical site URL is required to build absolute item links
    #[error("Site URL is not configured (set `url` in _config.yml or SITE_URL)")]
    MissingSiteUrl,

    #[error("Invalid site URL {url:?}: {source}")]
    InvalidSiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("RSS validation failed: {0}")]
    Validation(String),
}

/// Build the feed and serialize it to XML
pub fn build_feed(config: &SiteConfig, posts: &[Post]) -> Result<String, FeedError> {
    Ok(build_channel(config, posts)?.to_string())
}

/// Build the feed channel, one item per post in the given order
pub fn build_channel(config: &SiteConfig, posts: &[Post]) -> Result<Channel, FeedError> {
    let site = config.site_url().ok_or(FeedError::MissingSiteUrl)?;
    let site_url = Url::parse(site).map_err(|source| FeedError::InvalidSiteUrl {
        url: site.to_string(),
        source,
    })?;

    let items = posts
        .iter()
        .map(|post| post_to_item(post, config, &site_url))
        .collect::<Result<Vec<_>, _>>()?;

    let channel = ChannelBuilder::default()
        .title(config.title.clone())
        .link(site_url.to_string())
        .description(config.description.clone())
        .language(config.language.clone())
        .generator(format!("collective-blog {}", env!("CARGO_PKG_VERSION")))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| FeedError::Validation(e.to_string()))?;

    Ok(channel)
}

fn post_to_item(post: &Post, config: &SiteConfig, site_url: &Url) -> Result<Item, FeedError> {
    let link = site_url
        .join(&config.post_path(&post.slug))
        .map_err(|source| FeedError::InvalidSiteUrl {
            url: site_url.to_string(),
            source,
        })?
        .to_string();

    let pub_date = post
        .published_date()
        .map(|d| d.format(PUB_DATE_FORMAT).to_string());
    if pub_date.is_none() {
        tracing::warn!(
            "Post {:?} has unparseable publishedAt {:?}, omitting pubDate",
            post.slug,
            post.published_at
        );
    }

    Ok(ItemBuilder::default()
        .title(post.title.clone())
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(post.description_or_empty().to_string())
        .pub_date(pub_date)
        .build())
}
