//! HTTP query surface over the tracker.

use crate::config::Config;
use crate::filters::{filter_by_threshold, find_global_minimum};
use crate::ontap::{OnTapClient, Offer, PageSource, VenueSet};
use crate::tracker::{Tracker, TrackerError};
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    tracker: Arc<Tracker>,
    price_limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct BeersQuery {
    price: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors returned by the HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    Tracker(TrackerError),
    BadRequest(String),
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        Self::Tracker(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Tracker(err @ TrackerError::Discovery(_)) => {
                warn!("{}", err);
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            Self::Tracker(err @ TrackerError::EmptyInput) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Bars with beers at or under `price` (default from config).
async fn beers_handler(
    State(state): State<AppState>,
    Query(query): Query<BeersQuery>,
) -> Result<Json<VenueSet>, ApiError> {
    let limit = match query.price.as_deref().map(str::trim) {
        None | Some("") => state.price_limit,
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| ApiError::BadRequest(format!("invalid price '{}'", raw)))?,
    };

    let set = state.tracker.collect().await?;
    Ok(Json(filter_by_threshold(&set, limit)))
}

/// The cheapest beers across all bars, ties included.
async fn lowest_handler(State(state): State<AppState>) -> Result<Json<Vec<Offer>>, ApiError> {
    let set = state.tracker.collect().await?;
    Ok(Json(find_global_minimum(&set)?))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([Method::GET]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Builds the router serving `/beers`, `/lowest`, and `/health`.
pub fn router(tracker: Arc<Tracker>, config: &Config) -> Router {
    let state = AppState { tracker, price_limit: config.price_limit };

    Router::new()
        .route("/beers", get(beers_handler))
        .route("/lowest", get(lowest_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `config.port` until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let client = OnTapClient::new(&config).context("Failed to create HTTP client")?;
    let source: Arc<dyn PageSource> = Arc::new(client);
    let tracker = Arc::new(Tracker::from_config(source, &config));
    let app = router(tracker, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
