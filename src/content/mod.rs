//! Content module - the backend client, the post model and the post queries

pub mod client;
mod error;
mod post;
pub mod queries;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ContentClient, ContentSource, QueryParams};
pub use error::{ContentError, Result};
pub use post::{is_valid_slug, parse_timestamp, Body, Post};
pub use queries::PostQueries;
