//! Menu category REST endpoints

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
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<mealbox_database::Category> for CategoryResponse {
    fn from(category: mealbox_database::Category) -> Self {
        Self {
            id: category.public_id,
            name: category.name,
            sort_order: category.sort_order,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

/// Create category routes
pub fn create_category_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/categories",
            axum::routing::get(list_categories).post(create_category),
        )
        .route(
            "/categories/:category_id",
            axum::routing::get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "Categories in display order", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_categories(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<CategoryResponse>>> {
    let categories = state.categories.list().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Name already exists")
    )
)]
pub async fn create_category(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateCategoryRequest>,
) -> GatewayResult<impl IntoResponse> {
    let category = state
        .categories
        .create(&mealbox_database::CreateCategoryRequest { name: payload.name })
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

#[utoipa::path(
    get,
    path = "/api/categories/{category_id}",
    tag = "Categories",
    params(("category_id" = String, Path, description = "Category public ID")),
    responses(
        (status = 200, description = "Category details", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    Path(category_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<CategoryResponse>> {
    let category = state
        .categories
        .find_by_public_id(&category_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Category not found".to_string()))?;

    Ok(Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{category_id}",
    tag = "Categories",
    params(("category_id" = String, Path, description = "Category public ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    Path(category_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> GatewayResult<Json<CategoryResponse>> {
    let category = state
        .categories
        .update(
            &category_id,
            &mealbox_database::UpdateCategoryRequest { name: payload.name },
        )
        .await?;

    Ok(Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{category_id}",
    tag = "Categories",
    params(("category_id" = String, Path, description = "Category public ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    Path(category_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<impl IntoResponse> {
    state.categories.delete(&category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
