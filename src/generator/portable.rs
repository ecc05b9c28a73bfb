//! Render rich-content body blocks (Portable Text) to HTML
//!
//! Only text blocks are understood. Other block types are skipped.

use serde_json::Value;
use std::collections::HashMap;
use url::Url;

use crate::helpers::html_escape;

/// Render body blocks to an HTML fragment
pub fn render_blocks(blocks: &[Value]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let kind = block.get("_type").and_then(Value::as_str).unwrap_or("");
        if kind != "block" {
            tracing::debug!("Skipping unsupported block type {:?}", kind);
            continue;
        }

        let list_tag = match block.get("listItem").and_then(Value::as_str) {
            Some("number") => Some("ol"),
            Some(_) => Some("ul"),
            None => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>\n", tag));
            }
            if let Some(tag) = list_tag {
                html.push_str(&format!("<{}>\n", tag));
            }
            open_list = list_tag;
        }

        let inner = render_children(block);
        if list_tag.is_some() {
            html.push_str(&format!("<li>{}</li>\n", inner));
            continue;
        }

        let tag = match block.get("style").and_then(Value::as_str).unwrap_or("normal") {
            style @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote") => style,
            _ => "p",
        };
        html.push_str(&format!("<{tag}>{inner}</{tag}>\n"));
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>\n", tag));
    }

    html
}

/// Render the spans of a text block
fn render_children(block: &Value) -> String {
    // Annotation marks point into markDefs by key
    let links: HashMap<&str, &str> = block
        .get("markDefs")
        .and_then(Value::as_array)
        .map(|defs| {
            defs.iter()
                .filter(|d| d.get("_type").and_then(Value::as_str) == Some("link"))
                .filter_map(|d| {
                    let key = d.get("_key")?.as_str()?;
                    let href = d.get("href")?.as_str()?;
                    if !is_allowed_href(href) {
                        tracing::warn!("Dropping link with disallowed href {:?}", href);
                        return None;
                    }
                    Some((key, href))
                })
                .collect()
        })
        .unwrap_or_default();

    let Some(children) = block.get("children").and_then(Value::as_array) else {
        return String::new();
    };

    let mut html = String::new();
    for child in children {
        let Some(text) = child.get("text").and_then(Value::as_str) else {
            continue;
        };
        let mut span = html_escape(text).replace('\n', "<br>");

        let marks = child
            .get("marks")
            .and_then(Value::as_array)
            .map(|m| m.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();

        for mark in marks {
            span = match mark {
                "strong" => format!("<strong>{}</strong>", span),
                "em" => format!("<em>{}</em>", span),
                "code" => format!("<code>{}</code>", span),
                "underline" => format!("<u>{}</u>", span),
                "strike-through" => format!("<s>{}</s>", span),
                key => match links.get(key) {
                    Some(href) => format!(r#"<a href="{}">{}</a>"#, html_escape(href), span),
                    None => span,
                },
            };
        }

        html.push_str(&span);
    }

    html
}

/// Absolute http(s) and mailto links, or references relative to the site
fn is_allowed_href(href: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "mailto"),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
