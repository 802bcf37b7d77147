//! Common test utilities

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use folio_order::{Collection, MemoryStore, OrderUpdate, OrderableItem};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Items with the given ids at orders `1..=N`, each carrying a `title`.
pub fn numbered_items(ids: &[&str]) -> Vec<OrderableItem> {
    (1_i64..)
        .zip(ids)
        .map(|(order, id)| OrderableItem::new(*id, order).with_field("title", id.to_uppercase()))
        .collect()
}

/// In-memory store holding `numbered_items(ids)` in `collection`
pub fn seeded_store(collection: Collection, ids: &[&str]) -> MemoryStore {
    MemoryStore::new().with_items(collection, numbered_items(ids))
}

pub fn ids_of(items: &[OrderableItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

pub fn orders_of(items: &[OrderableItem]) -> Vec<i64> {
    items.iter().map(|item| item.order).collect()
}

/// Apply a plan to a local copy of a snapshot, the way the store would.
pub fn apply_locally(items: &[OrderableItem], plan: &[OrderUpdate]) -> Vec<OrderableItem> {
    let mut result = items.to_vec();
    for update in plan {
        if let Some(item) = result.iter_mut().find(|item| item.id == update.id) {
            item.order = update.to;
        }
    }
    result
}

/// `true` when the orders are exactly `1..=N` in some arrangement.
pub fn is_contiguous(items: &[OrderableItem]) -> bool {
    let mut orders = orders_of(items);
    orders.sort_unstable();
    orders.into_iter().eq(1_i64..=i64::try_from(items.len()).unwrap())
}

// ============ Fake content API ============

#[derive(Default)]
struct ApiData {
    collections: HashMap<String, Vec<Value>>,
    failing_ids: HashSet<String>,
    authorizations: Vec<Option<String>>,
    requests: Vec<String>,
    next_id: u64,
}

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// A small REST document store served over HTTP on a random local port.
///
/// Collections are keyed by endpoint path (single segment). When a token is
/// configured every request must carry `Authorization: Bearer <token>`.
#[derive(Clone, Default)]
pub struct TestApi {
    data: Arc<Mutex<ApiData>>,
    token: Option<String>,
    wrap_responses: bool,
}

impl TestApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require this bearer token on every request.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Answer with `{ "data": ... }` instead of bare JSON.
    pub fn wrapped(mut self) -> Self {
        self.wrap_responses = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ApiData> {
        self.data.lock().unwrap()
    }

    pub fn seed(&self, endpoint: &str, items: &[OrderableItem]) {
        let docs = items
            .iter()
            .map(|item| serde_json::to_value(item).unwrap())
            .collect();
        self.lock().collections.insert(endpoint.to_string(), docs);
    }

    /// Answer PUT and DELETE for `id` with a 500.
    pub fn fail_writes_for(&self, id: &str) {
        self.lock().failing_ids.insert(id.to_string());
    }

    /// `Authorization` header of every request received, in arrival order.
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.lock().authorizations.clone()
    }

    /// `METHOD /path` of every authorized request, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// `(id, order)` pairs of a collection, sorted by order.
    pub fn orders(&self, endpoint: &str) -> Vec<(String, i64)> {
        let mut pairs: Vec<(String, i64)> = self
            .lock()
            .collections
            .get(endpoint)
            .into_iter()
            .flatten()
            .map(|doc| {
                (
                    doc["_id"].as_str().unwrap_or_default().to_string(),
                    doc["order"].as_i64().unwrap_or_default(),
                )
            })
            .collect();
        pairs.sort_by_key(|(_, order)| *order);
        pairs
    }

    /// Start serving and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/{collection}", get(list).post(create))
            .route("/{collection}/{id}", get(read).put(replace).delete(remove))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test API");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        format!("http://{addr}")
    }

    fn authorize(&self, headers: &HeaderMap, request: String) -> ApiResult<()> {
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let allowed = match &self.token {
            Some(token) => presented.as_deref() == Some(format!("Bearer {token}").as_str()),
            None => true,
        };

        let mut data = self.lock();
        data.authorizations.push(presented);
        if !allowed {
            return Err((StatusCode::UNAUTHORIZED, "missing or invalid token".to_string()));
        }
        data.requests.push(request);
        Ok(())
    }

    fn respond(&self, value: Value) -> Json<Value> {
        if self.wrap_responses {
            Json(json!({ "data": value }))
        } else {
            Json(value)
        }
    }
}

fn not_found(id: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("no document {id}"))
}

async fn list(
    State(api): State<TestApi>,
    headers: HeaderMap,
    Path(collection): Path<String>,
) -> ApiResult<Json<Value>> {
    api.authorize(&headers, format!("GET /{collection}"))?;
    let docs = api
        .lock()
        .collections
        .get(&collection)
        .cloned()
        .unwrap_or_default();
    Ok(api.respond(Value::Array(docs)))
}

async fn create(
    State(api): State<TestApi>,
    headers: HeaderMap,
    Path(collection): Path<String>,
    Json(mut body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    api.authorize(&headers, format!("POST /{collection}"))?;
    let doc = {
        let mut data = api.lock();
        data.next_id += 1;
        let id = format!("{collection}-{}", data.next_id);
        body["_id"] = json!(id);
        data.collections
            .entry(collection)
            .or_default()
            .push(body.clone());
        body
    };
    Ok((StatusCode::CREATED, api.respond(doc)))
}

async fn read(
    State(api): State<TestApi>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    api.authorize(&headers, format!("GET /{collection}/{id}"))?;
    let doc = api
        .lock()
        .collections
        .get(&collection)
        .and_then(|docs| docs.iter().find(|doc| doc["_id"] == json!(id)).cloned())
        .ok_or_else(|| not_found(&id))?;
    Ok(api.respond(doc))
}

async fn replace(
    State(api): State<TestApi>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
    Json(mut body): Json<Value>,
) -> ApiResult<Json<Value>> {
    api.authorize(&headers, format!("PUT /{collection}/{id}"))?;
    let mut data = api.lock();
    if data.failing_ids.contains(&id) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "write rejected".to_string()));
    }
    let doc = data
        .collections
        .get_mut(&collection)
        .and_then(|docs| docs.iter_mut().find(|doc| doc["_id"] == json!(id)))
        .ok_or_else(|| not_found(&id))?;
    body["_id"] = json!(id);
    *doc = body.clone();
    drop(data);
    Ok(api.respond(body))
}

async fn remove(
    State(api): State<TestApi>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    api.authorize(&headers, format!("DELETE /{collection}/{id}"))?;
    let mut data = api.lock();
    if data.failing_ids.contains(&id) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "write rejected".to_string()));
    }
    let docs = data
        .collections
        .get_mut(&collection)
        .ok_or_else(|| not_found(&id))?;
    let position = docs
        .iter()
        .position(|doc| doc["_id"] == json!(id))
        .ok_or_else(|| not_found(&id))?;
    docs.remove(position);
    Ok(StatusCode::NO_CONTENT)
}
