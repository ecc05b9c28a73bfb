//! HTTP client for the content backend query API
//!
//! Queries are GROQ strings sent to
//! `https://{project}.api[cdn].sanity.io/v{api_version}/data/query/{dataset}`.
//! Named parameters travel as `$name=<json>` pairs, never inside the query
//! text.

use async_trait::async_trait;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::error::{ContentError, Result};
use crate::config::ContentConfig;

/// Longest GET URL sent before switching to POST
const MAX_GET_URL_LEN: usize = 11 * 1024;

lazy_static! {
    static ref PROJECT_ID_RE: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
    static ref DATASET_RE: Regex = Regex::new(r"^~?[a-z0-9][a-z0-9_-]{0,63}$").unwrap();
    static ref API_VERSION_RE: Regex = Regex::new(r"^(1|X|\d{4}-\d{2}-\d{2})$").unwrap();
}

/// Named query parameters, bound as `$name` in the query
pub type QueryParams = IndexMap<String, Value>;

/// Something that can answer a GROQ query
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run `query` with `params` and return the raw `result` value
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value>;
}

/// Read-only client for the content backend
#[derive(Debug, Clone)]
pub struct ContentClient {
    config: ContentConfig,
    endpoint: Url,
    http: Client,
}

impl ContentClient {
    /// Create a client; connection settings are fixed from here on
    pub fn new(config: ContentConfig) -> Result<Self> {
        validate(&config)?;
        let endpoint = query_endpoint(&config)?;

        let http = Client::builder()
            .user_agent(concat!("collective-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!("Content endpoint: {}", endpoint);

        Ok(Self {
            config,
            endpoint,
            http,
        })
    }

    /// Connection settings
    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// Query endpoint without parameters
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run a query and decode its result into `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &QueryParams,
    ) -> Result<T> {
        let value = self.fetch(query, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn get_url(&self, query: &str, params: &QueryParams) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${}", name), &serde_json::to_string(value)?);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value> {
        let url = self.get_url(query, params)?;

        let request = if url.as_str().len() > MAX_GET_URL_LEN {
            tracing::debug!("Query URL is {} bytes, using POST", url.as_str().len());
            self.http
                .post(self.endpoint.clone())
                .json(&QueryRequest { query, params })
        } else {
            self.http.get(url)
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ContentError::Backend {
                status: status.as_u16(),
                message: backend_message(&body),
            });
        }

        let envelope: QueryResponse = serde_json::from_slice(&body)?;
        if let Some(ms) = envelope.ms {
            tracing::debug!("Query answered in {}ms", ms);
        }

        Ok(envelope.result)
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    params: &'a QueryParams,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    ms: Option<u64>,
}

fn validate(config: &ContentConfig) -> Result<()> {
    if config.project_id.is_empty() {
        return Err(ContentError::Config(format!(
            "missing project id, set {}",
            crate::config::PROJECT_ID_ENV
        )));
    }
    if !PROJECT_ID_RE.is_match(&config.project_id) {
        return Err(ContentError::Config(format!(
            "project id {:?} may only contain a-z, 0-9 and dashes",
            config.project_id
        )));
    }
    if !DATASET_RE.is_match(&config.dataset) {
        return Err(ContentError::Config(format!(
            "dataset {:?} must be lowercase alphanumerics, dashes or underscores (max 64)",
            config.dataset
        )));
    }
    let valid_version = API_VERSION_RE.is_match(&config.api_version)
        && (config.api_version.len() < 10
            || chrono::NaiveDate::parse_from_str(&config.api_version, "%Y-%m-%d").is_ok());
    if !valid_version {
        return Err(ContentError::Config(format!(
            "api version {:?} must be `1`, `X` or a YYYY-MM-DD date",
            config.api_version
        )));
    }
    Ok(())
}

fn query_endpoint(config: &ContentConfig) -> Result<Url> {
    let host = match config.api_host.as_deref() {
        Some(host) => host.trim_end_matches('/').to_string(),
        None => {
            let api = if config.use_cdn { "apicdn" } else { "api" };
            format!("https://{}.{}.sanity.io", config.project_id, api)
        }
    };

    Ok(Url::parse(&format!(
        "{}/v{}/data/query/{}",
        host, config.api_version, config.dataset
    ))?)
}

/// Extract a readable message from a backend error body
fn backend_message(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return text.trim().chars().take(200).collect();
    };

    match value.get("error") {
        Some(Value::Object(detail)) => {
            let description = detail
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            match detail.get("type").and_then(Value::as_str) {
                Some(kind) => format!("{} ({})", description, kind),
                None => description.to_string(),
            }
        }
        Some(Value::String(error)) => value
            .get("message")
            .and_then(Value::as_str)
            .map(|m| format!("{}: {}", error, m))
            .unwrap_or_else(|| error.clone()),
        _ => text.trim().chars().take(200).collect(),
    }
}
