//! Food (menu item) REST endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodResponse {
    pub id: String,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: i64,
    pub calories: i64,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<mealbox_database::Food> for FoodResponse {
    fn from(food: mealbox_database::Food) -> Self {
        Self {
            id: food.public_id,
            category_id: food.category_id,
            name: food.name,
            description: food.description,
            picture_url: food.picture_url,
            price_cents: food.price_cents,
            calories: food.calories,
            sort_order: food.sort_order,
            is_active: food.is_active,
            created_at: food.created_at,
            updated_at: food.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFoodRequest {
    /// Public ID of the owning category
    pub category: String,
    pub name: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: i64,
    pub calories: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFoodRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: Option<i64>,
    pub calories: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListFoodsQuery {
    /// Restrict the listing to one category (public ID)
    pub category: Option<String>,
}

/// Create food routes
pub fn create_food_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/foods", axum::routing::get(list_foods).post(create_food))
        .route(
            "/foods/:food_id",
            axum::routing::get(get_food).put(update_food).delete(delete_food),
        )
}

#[utoipa::path(
    get,
    path = "/api/foods",
    tag = "Foods",
    params(ListFoodsQuery),
    responses(
        (status = 200, description = "Foods in display order", body = Vec<FoodResponse>),
        (status = 404, description = "Unknown category filter"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_foods(
    Query(params): Query<ListFoodsQuery>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<FoodResponse>>> {
    let category_id = match params.category {
        Some(public_id) => Some(
            state
                .categories
                .find_by_public_id(&public_id)
                .await?
                .ok_or_else(|| GatewayError::NotFound("Category not found".to_string()))?
                .id,
        ),
        None => None,
    };

    let foods = state.foods.list(category_id).await?;
    Ok(Json(foods.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/foods",
    tag = "Foods",
    request_body = CreateFoodRequest,
    responses(
        (status = 201, description = "Food created", body = FoodResponse),
        (status = 404, description = "Unknown category"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_food(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateFoodRequest>,
) -> GatewayResult<impl IntoResponse> {
    let category = state
        .categories
        .find_by_public_id(&payload.category)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Category not found".to_string()))?;

    let food = state
        .foods
        .create(&mealbox_database::CreateFoodRequest {
            category_id: category.id,
            name: payload.name,
            description: payload.description,
            picture_url: payload.picture_url,
            price_cents: payload.price_cents,
            calories: payload.calories,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(FoodResponse::from(food))))
}

#[utoipa::path(
    get,
    path = "/api/foods/{food_id}",
    tag = "Foods",
    params(("food_id" = String, Path, description = "Food public ID")),
    responses(
        (status = 200, description = "Food details", body = FoodResponse),
        (status = 404, description = "Food not found")
    )
)]
pub async fn get_food(
    Path(food_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<FoodResponse>> {
    let food = state
        .foods
        .find_by_public_id(&food_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Food not found".to_string()))?;

    Ok(Json(FoodResponse::from(food)))
}

#[utoipa::path(
    put,
    path = "/api/foods/{food_id}",
    tag = "Foods",
    params(("food_id" = String, Path, description = "Food public ID")),
    request_body = UpdateFoodRequest,
    responses(
        (status = 200, description = "Food updated", body = FoodResponse),
        (status = 404, description = "Food not found")
    )
)]
pub async fn update_food(
    Path(food_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<UpdateFoodRequest>,
) -> GatewayResult<Json<FoodResponse>> {
    let food = state
        .foods
        .update(
            &food_id,
            &mealbox_database::UpdateFoodRequest {
                name: payload.name,
                description: payload.description,
                picture_url: payload.picture_url,
                price_cents: payload.price_cents,
                calories: payload.calories,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(FoodResponse::from(food)))
}

#[utoipa::path(
    delete,
    path = "/api/foods/{food_id}",
    tag = "Foods",
    params(("food_id" = String, Path, description = "Food public ID")),
    responses(
        (status = 204, description = "Food deleted"),
        (status = 404, description = "Food not found")
    )
)]
pub async fn delete_food(
    Path(food_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<impl IntoResponse> {
    state.foods.delete(&food_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
