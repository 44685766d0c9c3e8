use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::models::{TripPlan, TripRequest};
use crate::planner::TripPlanner;

pub fn router(planner: Arc<TripPlanner>) -> Router {
    Router::new()
        .route("/plan_trip", post(plan_trip))
        .route("/health", get(health))
        .with_state(planner)
}

/// Run the full pipeline for one request.
///
/// Always answers 200; each section of the body carries its own data or
/// error payload.
async fn plan_trip(
    State(planner): State<Arc<TripPlanner>>,
    Json(request): Json<TripRequest>,
) -> Json<TripPlan> {
    Json(planner.plan(&request).await)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}
