//! Estate and tree endpoints.
//!
//! Handlers only unpack the request and hand it to `PlantationService`;
//! all rules live in the service and the core crate.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::AppState;
use plantation_core::{CreateEstateRequest, DronePlan, EstateStats, PlantTreeRequest, Tree};

/// Response carrying the ID of a created resource.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// A tree as listed under its estate.
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeView {
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub height: i64,
}

impl From<Tree> for TreeView {
    fn from(tree: Tree) -> Self {
        Self {
            id: tree.id,
            x: tree.x,
            y: tree.y,
            height: tree.height,
        }
    }
}

/// Create a new estate.
/// POST /estate
pub async fn create_estate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEstateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let Json(req) = payload?;
    let length = req.length.ok_or_else(|| ApiError::missing_field("length"))?;
    let width = req.width.ok_or_else(|| ApiError::missing_field("width"))?;

    let estate = state
        .service()
        .create_estate(width, length, state.request_deadline())
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id: estate.id })))
}

/// Plant a tree on one plot of an estate.
/// POST /estate/:id/tree
pub async fn plant_tree(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
    payload: Result<Json<PlantTreeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let Json(req) = payload?;
    let x = req.x.ok_or_else(|| ApiError::missing_field("x"))?;
    let y = req.y.ok_or_else(|| ApiError::missing_field("y"))?;
    let height = req.height.ok_or_else(|| ApiError::missing_field("height"))?;

    let tree = state
        .service()
        .plant_tree(&estate_id, x, y, height, state.request_deadline())
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse { id: tree.id })))
}

/// GET /estate/:id/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
) -> Result<Json<EstateStats>, ApiError> {
    let stats = state
        .service()
        .estate_stats(&estate_id, state.request_deadline())
        .await?;
    Ok(Json(stats))
}

/// GET /estate/:id/drone-plan
pub async fn get_drone_plan(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
) -> Result<Json<DronePlan>, ApiError> {
    let plan = state
        .service()
        .drone_plan(&estate_id, state.request_deadline())
        .await?;
    Ok(Json(plan))
}

/// List trees in drone visiting order.
/// GET /estate/:id/trees
pub async fn list_trees(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
) -> Result<Json<Vec<TreeView>>, ApiError> {
    let trees = state
        .service()
        .list_trees(&estate_id, state.request_deadline())
        .await?;
    Ok(Json(trees.into_iter().map(TreeView::from).collect()))
}
