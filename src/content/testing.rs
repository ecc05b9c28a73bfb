//! In-process stand-in for the content backend, used by tests.
//!
//! Understands just enough GROQ for the post queries: the `_type` filter,
//! the drafts-path exclusion, `slug.current == $slug`, `order(publishedAt desc)`,
//! `[0]` and the post projection. Any query not starting with `*[` is echoed
//! back as `{ "query", "params" }`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use crate::config::ContentConfig;

/// A request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub method: &'static str,
    pub version: String,
    pub dataset: String,
    pub query: String,
    pub params: serde_json::Map<String, Value>,
}

struct LakeState {
    documents: Vec<Value>,
    failure: Option<(StatusCode, Value)>,
    requests: Mutex<Vec<RecordedQuery>>,
}

/// Running mock backend
pub struct MockLake {
    addr: SocketAddr,
    state: Arc<LakeState>,
}

impl MockLake {
    /// Serve `documents` as stored documents (`slug: {current}`, `coverImage: {asset: {url}}`)
    pub async fn start(documents: Vec<Value>) -> Self {
        Self::spawn(LakeState {
            documents,
            failure: None,
            requests: Mutex::new(Vec::new()),
        })
        .await
    }

    /// Answer every query with `status` and `body`
    pub async fn failing(status: StatusCode, body: Value) -> Self {
        Self::spawn(LakeState {
            documents: Vec::new(),
            failure: Some((status, body)),
            requests: Mutex::new(Vec::new()),
        })
        .await
    }

    /// Config pointing at a port nothing listens on
    pub async fn unreachable_config() -> ContentConfig {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        config_for(addr)
    }

    async fn spawn(state: LakeState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/:version/data/query/:dataset", get(get_query).post(post_query))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn config(&self) -> ContentConfig {
        config_for(self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedQuery> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// Stored document the way the backend keeps a post
pub fn stored_post(id: &str, slug: &str, published_at: &str) -> Value {
    json!({
        "_id": id,
        "_type": "post",
        "title": format!("Post {}", slug.to_uppercase()),
        "slug": { "_type": "slug", "current": slug },
        "publishedAt": published_at,
        "body": [],
    })
}

fn config_for(addr: SocketAddr) -> ContentConfig {
    ContentConfig {
        project_id: "test".to_string(),
        api_host: Some(format!("http://{}", addr)),
        ..ContentConfig::default()
    }
}

async fn get_query(
    State(state): State<Arc<LakeState>>,
    Path((version, dataset)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let mut query = String::new();
    let mut params = serde_json::Map::new();
    for (key, value) in pairs {
        if key == "query" {
            query = value;
        } else if let Some(name) = key.strip_prefix('$') {
            match serde_json::from_str(&value) {
                Ok(parsed) => {
                    params.insert(name.to_string(), parsed);
                }
                Err(_) => return (StatusCode::BAD_REQUEST, "invalid param").into_response(),
            }
        }
    }

    answer(&state, "GET", version, dataset, query, params)
}

async fn post_query(
    State(state): State<Arc<LakeState>>,
    Path((version, dataset)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let query = body["query"].as_str().unwrap_or_default().to_string();
    let params = body["params"].as_object().cloned().unwrap_or_default();
    answer(&state, "POST", version, dataset, query, params)
}

fn answer(
    state: &LakeState,
    method: &'static str,
    version: String,
    dataset: String,
    query: String,
    params: serde_json::Map<String, Value>,
) -> Response {
    state.requests.lock().unwrap().push(RecordedQuery {
        method,
        version,
        dataset,
        query: query.clone(),
        params: params.clone(),
    });

    if let Some((status, body)) = &state.failure {
        return (*status, Json(body.clone())).into_response();
    }

    let result = if query.trim_start().starts_with("*[") {
        evaluate(&state.documents, &query, &params)
    } else {
        json!({ "query": query, "params": params })
    };

    Json(json!({ "ms": 1, "query": query, "result": result })).into_response()
}

fn evaluate(documents: &[Value], query: &str, params: &serde_json::Map<String, Value>) -> Value {
    let mut matches: Vec<&Value> = documents
        .iter()
        .filter(|doc| !query.contains(r#"_type == "post""#) || doc["_type"] == "post")
        .filter(|doc| {
            !query.contains(r#"!(_id in path("drafts.**"))"#)
                || !doc["_id"].as_str().unwrap_or_default().starts_with("drafts.")
        })
        .filter(|doc| {
            !query.contains("slug.current == $slug")
                || Some(&doc["slug"]["current"]) == params.get("slug")
        })
        .collect();

    if query.contains("order(publishedAt desc)") {
        matches.sort_by(|a, b| {
            let a = a["publishedAt"].as_str().unwrap_or_default();
            let b = b["publishedAt"].as_str().unwrap_or_default();
            b.cmp(a)
        });
    }

    let projected: Vec<Value> = matches.into_iter().map(project).collect();

    if query.contains("][0]") {
        projected.into_iter().next().unwrap_or(Value::Null)
    } else {
        Value::Array(projected)
    }
}

fn project(doc: &Value) -> Value {
    json!({
        "_id": doc["_id"],
        "title": doc["title"],
        "slug": doc["slug"]["current"],
        "description": doc["description"],
        "publishedAt": doc["publishedAt"],
        "body": doc["body"],
        "coverImage": doc["coverImage"]["asset"]["url"],
    })
}
