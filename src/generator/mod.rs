//! Generator module - renders posts into static HTML files and the RSS feed

pub mod feed;
pub mod portable;

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::Post;
use crate::helpers::{
    feed_tag, full_url_for, meta_generator, output_file, strip_html, truncate, url_for,
};
use crate::templates::{NavPost, PostData, SiteData, TemplateRenderer};
use crate::Blog;

pub use feed::{build_channel, build_feed, FeedError};

/// Longest summary derived from body text
const SUMMARY_LENGTH: usize = 160;

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
        })
    }

    /// Generate the entire site from posts ordered newest first
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        let publishable: Vec<Post> = posts
            .iter()
            .filter(|post| {
                let valid = post.has_valid_slug();
                if !valid {
                    tracing::warn!("Skipping post {}: unsafe slug {:?}", post.id, post.slug);
                }
                valid
            })
            .cloned()
            .collect();
        let posts = publishable.as_slice();

        // The feed goes first: a missing site URL must abort before anything is written
        let feed = build_feed(&self.blog.config, posts)?;

        fs::create_dir_all(&self.blog.public_dir)?;

        // Copy static assets (styles, images, etc.)
        self.copy_static_assets()?;

        let site_data = self.build_site_data();

        self.generate_index_page(posts, &site_data)?;

        self.generate_post_pages(posts, &site_data)?;

        let feed_path = self
            .blog
            .public_dir
            .join(self.blog.config.feed_path.trim_start_matches('/'));
        write_file(&feed_path, &feed)?;
        tracing::info!("Generated {}", self.blog.config.feed_path);

        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(&self) -> SiteData {
        let config = &self.blog.config;
        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            url: config.site_url().map(str::to_string),
            feed_url: url_for(&config.feed_path),
            feed_tag: feed_tag(config),
            meta_generator: meta_generator(),
        }
    }

    fn build_post_data(&self, post: &Post, content: &str) -> PostData {
        let path = self.blog.config.post_path(&post.slug);
        PostData {
            title: post.title.clone(),
            slug: post.slug.clone(),
            permalink: full_url_for(&self.blog.config, &path),
            path,
            description: post.description.clone(),
            summary: summarize(post, content),
            published_at: post.published_at.clone(),
            cover_image: post.cover_image.clone(),
        }
    }

    fn create_base_context(&self, site_data: &SiteData) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context
    }

    /// Generate the home page listing every post
    fn generate_index_page(&self, posts: &[Post], site_data: &SiteData) -> Result<()> {
        let post_data: Vec<_> = posts
            .iter()
            .map(|p| self.build_post_data(p, &portable::render_blocks(p.body.blocks())))
            .collect();

        let mut context = self.create_base_context(site_data);
        context.insert("page_title", &site_data.title);
        context.insert("posts", &post_data);
        context.insert("canonical", &full_url_for(&self.blog.config, "/"));

        let html = self.renderer.render("index.html", &context)?;
        let output_path = self.blog.public_dir.join(output_file("/"));
        write_file(&output_path, &html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post], site_data: &SiteData) -> Result<()> {
        for post in posts {
            let content = portable::render_blocks(post.body.blocks());
            let data = self.build_post_data(post, &content);
            let nav = |p: &Post| NavPost {
                title: p.title.clone(),
                path: self.blog.config.post_path(&p.slug),
            };

            let mut context = self.create_base_context(site_data);
            context.insert("page_title", &format!("{} | {}", post.title, site_data.title));
            context.insert("content", &content);
            context.insert("canonical", &data.permalink);
            if let Some(newer) = post.newer(posts) {
                context.insert("newer_post", &nav(newer));
            }
            if let Some(older) = post.older(posts) {
                context.insert("older_post", &nav(older));
            }
            context.insert("post", &data);

            let html = self.renderer.render("post.html", &context)?;
            let output_path = self.blog.public_dir.join(output_file(&data.path));
            write_file(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    /// Copy the static directory into the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(relative) = path.strip_prefix(static_dir) else {
                continue;
            };

            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }
}

/// Description, or the start of the body text when there is none
fn summarize(post: &Post, content: &str) -> String {
    match post.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => description.to_string(),
        _ => {
            let text = strip_html(content);
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            truncate(&text, SUMMARY_LENGTH, None)
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}
