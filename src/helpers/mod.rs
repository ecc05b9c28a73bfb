//! Helper functions for pages and templates

mod html;
mod url;

pub use self::html::*;
pub use self::url::*;
