mod claims_http;
mod notify;
mod sources;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path as AxumPath, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use claims::{fetch_claim_views, ClaimsError, ClaimsRepository, ClaimsState};
use engine::{NotificationSink, RiskEngine};
use foundation::ids::BuildingId;
use risk::RiskMode;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use viewport::RecordingSurface;

use crate::claims_http::HttpClaimsRepository;
use crate::notify::WebhookNotifier;
use crate::sources::{GeocodeClient, HazardSource};

#[derive(Clone)]
struct AppState {
    engine: Arc<Mutex<RiskEngine<RecordingSurface>>>,
    claims_repo: Arc<HttpClaimsRepository>,
    hazard: Arc<HazardSource>,
    geocoder: Arc<GeocodeClient>,
    notifier: Arc<WebhookNotifier>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("DASHBOARD_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9200".to_string())
        .parse()
        .expect("invalid DASHBOARD_ADDR");
    let hazard_url =
        env::var("HAZARD_URL").unwrap_or_else(|_| "http://127.0.0.1:9300".to_string());
    let geocode_url =
        env::var("GEOCODE_URL").unwrap_or_else(|_| "http://127.0.0.1:9301".to_string());
    let claims_url =
        env::var("CLAIMS_URL").unwrap_or_else(|_| "http://127.0.0.1:9302".to_string());
    let notify_webhook_url = env::var("NOTIFY_WEBHOOK_URL").ok();

    let http = reqwest::Client::new();
    let state = AppState {
        engine: Arc::new(Mutex::new(RiskEngine::new(RecordingSurface::new()))),
        claims_repo: Arc::new(HttpClaimsRepository::new(http.clone(), claims_url)),
        hazard: Arc::new(HazardSource::new(http.clone(), hazard_url)),
        geocoder: Arc::new(GeocodeClient::new(http.clone(), geocode_url)),
        notifier: Arc::new(WebhookNotifier::new(http, notify_webhook_url)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/search", post(search))
        .route("/api/markers", get(get_markers))
        .route("/api/camera", get(get_camera))
        .route("/api/filter", get(get_filter))
        .route("/api/filter/mode", post(set_mode))
        .route("/api/filter/threshold", post(set_threshold))
        .route("/api/select", post(select))
        .route("/api/deselect", post(deselect))
        .route("/api/claims", get(get_claims))
        .route("/api/claims/:id", delete(delete_claim))
        .route("/api/detail", get(get_detail))
        .route("/api/notify", post(send_notification))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("risk dashboard listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
}

async fn search(State(state): State<AppState>, Json(req): Json<SearchRequest>) -> Response {
    let center = match state.geocoder.resolve(&req.query).await {
        Ok(center) => center,
        Err(err) => {
            warn!("geocoding failed: {err}");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "address could not be resolved" })),
            )
                .into_response();
        }
    };

    let records = match state.hazard.buildings_near(center).await {
        Ok(records) => records,
        Err(err) => {
            warn!("hazard lookup failed: {err}");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "hazard data unavailable" })),
            )
                .into_response();
        }
    };

    let mut engine = state.engine.lock().await;
    engine.load_buildings(records);
    (StatusCode::OK, Json(json!({ "count": engine.visuals().len() }))).into_response()
}

async fn get_markers(State(state): State<AppState>) -> Response {
    let engine = state.engine.lock().await;
    Json(engine.visuals()).into_response()
}

async fn get_camera(State(state): State<AppState>) -> Response {
    let engine = state.engine.lock().await;
    Json(engine.camera_pose()).into_response()
}

async fn get_filter(State(state): State<AppState>) -> Response {
    let engine = state.engine.lock().await;
    Json(*engine.filter()).into_response()
}

#[derive(Debug, Deserialize)]
struct ModeRequest {
    mode: RiskMode,
}

async fn set_mode(State(state): State<AppState>, Json(req): Json<ModeRequest>) -> Response {
    let mut engine = state.engine.lock().await;
    engine.set_mode(req.mode);
    Json(*engine.filter()).into_response()
}

#[derive(Debug, Deserialize)]
struct ThresholdRequest {
    mode: RiskMode,
    value: f64,
}

async fn set_threshold(
    State(state): State<AppState>,
    Json(req): Json<ThresholdRequest>,
) -> Response {
    let mut engine = state.engine.lock().await;
    match req.mode {
        RiskMode::Water => engine.set_water_threshold(req.value),
        RiskMode::Wind => engine.set_wind_threshold(req.value),
    }
    Json(*engine.filter()).into_response()
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    id: String,
}

async fn select(State(state): State<AppState>, Json(req): Json<SelectRequest>) -> Response {
    let id = BuildingId::new(req.id);

    // Take the selection turn under the lock, then fetch without holding it
    // so a newer selection can supersede this one mid-flight.
    let ticket = {
        let mut engine = state.engine.lock().await;
        if !engine.has_building(&id) {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "unknown building id" })),
            )
                .into_response();
        }
        engine.click_marker(&id)
    };

    if let Some(ticket) = ticket {
        let result = fetch_claim_views(state.claims_repo.as_ref(), ticket.building()).await;
        let mut engine = state.engine.lock().await;
        engine.apply_claims(&ticket, result);
        return claims_response(engine.claims());
    }

    let engine = state.engine.lock().await;
    claims_response(engine.claims())
}

async fn deselect(State(state): State<AppState>) -> Response {
    let mut engine = state.engine.lock().await;
    engine.deselect();
    claims_response(engine.claims())
}

async fn get_claims(State(state): State<AppState>) -> Response {
    let engine = state.engine.lock().await;
    claims_response(engine.claims())
}

async fn delete_claim(State(state): State<AppState>, AxumPath(id): AxumPath<String>) -> Response {
    match state.claims_repo.delete_claim(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(ClaimsError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "claim not found" })),
        )
            .into_response(),
        Err(err) => {
            error!("claim deletion failed: {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "claims backend unavailable" })),
            )
                .into_response()
        }
    }
}

async fn get_detail(State(state): State<AppState>) -> Response {
    let engine = state.engine.lock().await;
    match engine.selected_detail() {
        Some(detail) => Json(detail).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "selected": false })),
        )
            .into_response(),
    }
}

async fn send_notification(State(state): State<AppState>) -> Response {
    let summary = {
        let engine = state.engine.lock().await;
        engine.notification_summary()
    };
    let count = summary.count();

    match state.notifier.send(summary).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "notified": count }))).into_response(),
        Err(err) => {
            error!("notification dispatch failed: {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "notification delivery failed" })),
            )
                .into_response()
        }
    }
}

/// Claims panel state as the front end renders it: loading, the claim list,
/// or a retryable per-selection failure.
fn claims_response(state: &ClaimsState) -> Response {
    let body = match state {
        ClaimsState::Idle => json!({ "status": "idle" }),
        ClaimsState::Loading { building } => json!({
            "status": "loading",
            "building_id": building,
        }),
        ClaimsState::Loaded { building, claims } => json!({
            "status": "loaded",
            "building_id": building,
            "claims": claims,
        }),
        ClaimsState::Failed { building, error } => json!({
            "status": "failed",
            "building_id": building,
            "error": error.to_string(),
            "retryable": true,
        }),
    };
    Json(body).into_response()
}
