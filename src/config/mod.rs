//! Configuration module

mod site;

pub use site::ContentConfig;
pub use site::SiteConfig;
pub use site::{DATASET_ENV, PROJECT_ID_ENV, SITE_URL_ENV};
