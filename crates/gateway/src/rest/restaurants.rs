//! Restaurant REST endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub picture_url: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<mealbox_database::Restaurant> for RestaurantResponse {
    fn from(restaurant: mealbox_database::Restaurant) -> Self {
        Self {
            id: restaurant.public_id,
            name: restaurant.name,
            address: restaurant.address,
            picture_url: restaurant.picture_url,
            sort_order: restaurant.sort_order,
            is_active: restaurant.is_active,
            created_at: restaurant.created_at,
            updated_at: restaurant.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub address: Option<String>,
    pub picture_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub picture_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Create restaurant routes
pub fn create_restaurant_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/restaurants",
            axum::routing::get(list_restaurants).post(create_restaurant),
        )
        .route(
            "/restaurants/:restaurant_id",
            axum::routing::get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
}

#[utoipa::path(
    get,
    path = "/api/restaurants",
    tag = "Restaurants",
    responses(
        (status = 200, description = "Restaurants in display order", body = Vec<RestaurantResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_restaurants(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<RestaurantResponse>>> {
    let restaurants = state.restaurants.list().await?;
    Ok(Json(restaurants.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/restaurants",
    tag = "Restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 400, description = "Name already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_restaurant(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> GatewayResult<impl IntoResponse> {
    let restaurant = state
        .restaurants
        .create(&mealbox_database::CreateRestaurantRequest {
            name: payload.name,
            address: payload.address,
            picture_url: payload.picture_url,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RestaurantResponse::from(restaurant)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{restaurant_id}",
    tag = "Restaurants",
    params(("restaurant_id" = String, Path, description = "Restaurant public ID")),
    responses(
        (status = 200, description = "Restaurant details", body = RestaurantResponse),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn get_restaurant(
    Path(restaurant_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<RestaurantResponse>> {
    let restaurant = state
        .restaurants
        .find_by_public_id(&restaurant_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Restaurant not found".to_string()))?;

    Ok(Json(RestaurantResponse::from(restaurant)))
}

#[utoipa::path(
    put,
    path = "/api/restaurants/{restaurant_id}",
    tag = "Restaurants",
    params(("restaurant_id" = String, Path, description = "Restaurant public ID")),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant updated", body = RestaurantResponse),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn update_restaurant(
    Path(restaurant_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> GatewayResult<Json<RestaurantResponse>> {
    let restaurant = state
        .restaurants
        .update(
            &restaurant_id,
            &mealbox_database::UpdateRestaurantRequest {
                name: payload.name,
                address: payload.address,
                picture_url: payload.picture_url,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(RestaurantResponse::from(restaurant)))
}

#[utoipa::path(
    delete,
    path = "/api/restaurants/{restaurant_id}",
    tag = "Restaurants",
    params(("restaurant_id" = String, Path, description = "Restaurant public ID")),
    responses(
        (status = 204, description = "Restaurant deleted"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn delete_restaurant(
    Path(restaurant_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<impl IntoResponse> {
    state.restaurants.delete(&restaurant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
