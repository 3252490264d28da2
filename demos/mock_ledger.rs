//! In-memory stand-in for the ledger API, enough to run the quickstart.
//!
//!     cargo run --example mock_ledger
//!     SOZ_LEDGER_URL=http://127.0.0.1:8000 cargo run --example quickstart

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use dashmap::DashMap;
use serde_json::{json, Value};

const NOW: &str = "2025-01-01T00:00:00Z";

#[derive(Clone, Default)]
struct Ledger {
    next_id: Arc<AtomicU64>,
    entities: Arc<DashMap<String, Value>>,
    promises: Arc<DashMap<String, Value>>,
    evidence: Arc<DashMap<String, Vec<Value>>>,
}

impl Ledger {
    fn id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "not_found", "message": format!("{what} not found")})),
    )
        .into_response()
}

async fn create_entity(State(ledger): State<Ledger>, Json(body): Json<Value>) -> Response {
    let id = ledger.id("ent");
    let entity = json!({
        "id": id,
        "name": body["name"],
        "type": body["type"],
        "public_key": body.get("public_key"),
        "api_key": format!("sk_{id}"),
        "metadata": body.get("metadata"),
        "created_at": NOW,
    });
    ledger.entities.insert(id, entity.clone());
    (StatusCode::CREATED, Json(entity)).into_response()
}

async fn get_entity(State(ledger): State<Ledger>, Path(id): Path<String>) -> Response {
    match ledger.entities.get(&id) {
        Some(entity) => Json(entity.clone()).into_response(),
        None => not_found("Entity"),
    }
}

async fn create_promise(State(ledger): State<Ledger>, Json(body): Json<Value>) -> Response {
    let id = ledger.id("prm");
    let promise = json!({
        "id": id,
        "promisor_id": body["promisor_id"],
        "promisee_id": body["promisee_id"],
        "description": body["description"],
        "category": body.get("category").cloned().unwrap_or(json!("custom")),
        "status": "active",
        "deadline": body.get("deadline"),
        "created_at": NOW,
        "fulfilled_at": null,
    });
    ledger.promises.insert(id, promise.clone());
    (StatusCode::CREATED, Json(promise)).into_response()
}

async fn get_promise(State(ledger): State<Ledger>, Path(id): Path<String>) -> Response {
    match ledger.promises.get(&id) {
        Some(promise) => Json(promise.clone()).into_response(),
        None => not_found("Promise"),
    }
}

async fn transition(
    State(ledger): State<Ledger>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(mut promise) = ledger.promises.get_mut(&id) else {
        return not_found("Promise");
    };
    if promise["status"] != "active" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "invalid_transition", "message": "Promise is not active"})),
        )
            .into_response();
    }
    promise["status"] = body["status"].clone();
    if body["status"] == "fulfilled" {
        promise["fulfilled_at"] = json!(NOW);
    }
    Json(promise.clone()).into_response()
}

async fn submit_evidence(
    State(ledger): State<Ledger>,
    Path(promise_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !ledger.promises.contains_key(&promise_id) {
        return not_found("Promise");
    }
    let evidence = json!({
        "id": ledger.id("ev"),
        "promise_id": promise_id,
        "type": body["type"],
        "submitted_by": body["submitted_by"],
        "verified": false,
        "payload": body.get("payload"),
        "created_at": NOW,
        "hash": format!("{:016x}", body.to_string().len()),
    });
    ledger
        .evidence
        .entry(promise_id)
        .or_default()
        .push(evidence.clone());
    (StatusCode::CREATED, Json(evidence)).into_response()
}

async fn list_evidence(State(ledger): State<Ledger>, Path(promise_id): Path<String>) -> Response {
    let items = ledger
        .evidence
        .get(&promise_id)
        .map(|e| e.clone())
        .unwrap_or_default();
    Json(items).into_response()
}

async fn get_score(State(ledger): State<Ledger>, Path(entity_id): Path<String>) -> Response {
    let Some(entity) = ledger.entities.get(&entity_id).map(|e| e.clone()) else {
        return not_found("Entity");
    };
    let (mut total, mut fulfilled, mut broken) = (0u64, 0u64, 0u64);
    for promise in ledger.promises.iter() {
        if promise["promisor_id"] != entity_id.as_str() {
            continue;
        }
        total += 1;
        match promise["status"].as_str() {
            Some("fulfilled") => fulfilled += 1,
            Some("broken") => broken += 1,
            _ => {}
        }
    }
    let rated = fulfilled + broken > 0;
    let overall = rated.then(|| fulfilled as f64 / (fulfilled + broken) as f64 * 100.0);
    Json(json!({
        "entity_id": entity_id,
        "entity_name": entity["name"],
        "overall_score": overall,
        "level": if rated { "Reliable" } else { "Unrated" },
        "rated": rated,
        "total_promises": total,
        "fulfilled_count": fulfilled,
        "broken_count": broken,
        "avg_delay_hours": 0.0,
        "streak": fulfilled,
        "score_version": "v1",
        "last_updated": NOW,
    }))
    .into_response()
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/v1/entities", post(create_entity))
        .route("/v1/entities/{id}", get(get_entity))
        .route("/v1/promises", post(create_promise))
        .route("/v1/promises/{id}", get(get_promise))
        .route("/v1/promises/{id}/status", patch(transition))
        .route(
            "/v1/promises/{id}/evidence",
            post(submit_evidence).get(list_evidence),
        )
        .route("/v1/scores/{id}", get(get_score))
        .with_state(Ledger::default());

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    println!("Mock ledger listening on http://{addr}");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Cannot bind {addr}: {e}");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {e}");
    }
}
