use std::{future, io, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::Html,
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;

use crate::{
    artifacts::Artifacts,
    error::PredictErr,
    prediction::{self, PredictionResponse},
    request::PredictionRequest,
};

const WELCOME_PAGE: &str = include_str!("../assets/welcome.html");

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    artifacts: Arc<Artifacts>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<String>,
}

/// Builds the HTTP router around the loaded artifacts.
pub fn router(artifacts: Arc<Artifacts>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/locations", get(locations))
        .route("/predict", post(predict))
        .with_state(AppState { artifacts })
        .layer(CorsLayer::permissive())
}

/// Serves requests on `listener` until ctrl-c is received.
pub async fn serve(listener: TcpListener, artifacts: Arc<Artifacts>) -> io::Result<()> {
    axum::serve(listener, router(artifacts))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("received ctrl-c, shutting down"),
        Err(e) => {
            error!("failed to listen for ctrl-c, serving until killed: {e}");
            future::pending::<()>().await;
        }
    }
}

async fn home() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}

async fn locations(State(state): State<AppState>) -> Json<LocationsResponse> {
    Json(LocationsResponse {
        locations: state.artifacts.schema().locations().to_vec(),
    })
}

async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, PredictErr> {
    let request = PredictionRequest::from_json(&body)?;
    let response = prediction::predict(&state.artifacts, &request)?;
    Ok(Json(response))
}
