//! Reorder endpoints for the four orderable catalog collections.
//!
//! Each collection exposes `PUT /<collection>/reorder` with the same body
//! shape; all four routes funnel into one handler parameterized by
//! [`OrderedCollection`].

use axum::{extract::State, routing::put, Json, Router};
use mealbox_database::{OrderedCollection, ReorderItem};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItemPayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderItemPayload {
    pub id: String,
    pub order: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReorderResponse {
    pub success: bool,
}

/// Create reorder routes
pub fn create_reorder_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/restaurants/reorder", put(reorder_restaurants))
        .route("/categories/reorder", put(reorder_categories))
        .route("/foods/reorder", put(reorder_foods))
        .route("/packages/reorder", put(reorder_packages))
}

/// A missing or non-array `items`, or a malformed pair, is a 400.
fn parse_items(payload: &Value) -> GatewayResult<Vec<ReorderItem>> {
    let items = payload
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::InvalidRequest("items must be an array".to_string()))?;

    if items.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "items must be a non-empty array".to_string(),
        ));
    }

    items
        .iter()
        .map(|item| {
            let id = item
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    GatewayError::InvalidRequest("each item requires a string id".to_string())
                })?;
            let order = item.get("order").and_then(Value::as_i64).ok_or_else(|| {
                GatewayError::InvalidRequest("each item requires an integer order".to_string())
            })?;
            Ok(ReorderItem {
                id: id.to_string(),
                order,
            })
        })
        .collect()
}

async fn apply_reorder(
    state: &GatewayState,
    collection: OrderedCollection,
    payload: Value,
) -> GatewayResult<Json<ReorderResponse>> {
    let items = parse_items(&payload)?;

    state.ordering.reorder(collection, &items).await?;

    Ok(Json(ReorderResponse { success: true }))
}

#[utoipa::path(
    put,
    path = "/api/restaurants/reorder",
    tag = "Ordering",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Ordering applied", body = ReorderResponse),
        (status = 400, description = "Empty or malformed items"),
        (status = 404, description = "Unknown record id in batch"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn reorder_restaurants(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<Value>,
) -> GatewayResult<Json<ReorderResponse>> {
    apply_reorder(&state, OrderedCollection::Restaurants, payload).await
}

#[utoipa::path(
    put,
    path = "/api/categories/reorder",
    tag = "Ordering",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Ordering applied", body = ReorderResponse),
        (status = 400, description = "Empty or malformed items"),
        (status = 404, description = "Unknown record id in batch"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn reorder_categories(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<Value>,
) -> GatewayResult<Json<ReorderResponse>> {
    apply_reorder(&state, OrderedCollection::Categories, payload).await
}

#[utoipa::path(
    put,
    path = "/api/foods/reorder",
    tag = "Ordering",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Ordering applied", body = ReorderResponse),
        (status = 400, description = "Empty or malformed items"),
        (status = 404, description = "Unknown record id in batch"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn reorder_foods(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<Value>,
) -> GatewayResult<Json<ReorderResponse>> {
    apply_reorder(&state, OrderedCollection::Foods, payload).await
}

#[utoipa::path(
    put,
    path = "/api/packages/reorder",
    tag = "Ordering",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Ordering applied", body = ReorderResponse),
        (status = 400, description = "Empty or malformed items"),
        (status = 404, description = "Unknown record id in batch"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn reorder_packages(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<Value>,
) -> GatewayResult<Json<ReorderResponse>> {
    apply_reorder(&state, OrderedCollection::Packages, payload).await
}
