//! Meal package REST endpoints

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
pub struct PackageResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: i64,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<mealbox_database::Package> for PackageResponse {
    fn from(package: mealbox_database::Package) -> Self {
        Self {
            id: package.public_id,
            name: package.name,
            description: package.description,
            picture_url: package.picture_url,
            price_cents: package.price_cents,
            sort_order: package.sort_order,
            created_at: package.created_at,
            updated_at: package.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: Option<i64>,
}

/// Create package routes
pub fn create_package_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/packages",
            axum::routing::get(list_packages).post(create_package),
        )
        .route(
            "/packages/:package_id",
            axum::routing::get(get_package)
                .put(update_package)
                .delete(delete_package),
        )
}

#[utoipa::path(
    get,
    path = "/api/packages",
    tag = "Packages",
    responses(
        (status = 200, description = "Packages in display order", body = Vec<PackageResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_packages(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<PackageResponse>>> {
    let packages = state.packages.list().await?;
    Ok(Json(packages.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/packages",
    tag = "Packages",
    request_body = CreatePackageRequest,
    responses(
        (status = 201, description = "Package created", body = PackageResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_package(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreatePackageRequest>,
) -> GatewayResult<impl IntoResponse> {
    let package = state
        .packages
        .create(&mealbox_database::CreatePackageRequest {
            name: payload.name,
            description: payload.description,
            picture_url: payload.picture_url,
            price_cents: payload.price_cents,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PackageResponse::from(package))))
}

#[utoipa::path(
    get,
    path = "/api/packages/{package_id}",
    tag = "Packages",
    params(("package_id" = String, Path, description = "Package public ID")),
    responses(
        (status = 200, description = "Package details", body = PackageResponse),
        (status = 404, description = "Package not found")
    )
)]
pub async fn get_package(
    Path(package_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<PackageResponse>> {
    let package = state
        .packages
        .find_by_public_id(&package_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Package not found".to_string()))?;

    Ok(Json(PackageResponse::from(package)))
}

#[utoipa::path(
    put,
    path = "/api/packages/{package_id}",
    tag = "Packages",
    params(("package_id" = String, Path, description = "Package public ID")),
    request_body = UpdatePackageRequest,
    responses(
        (status = 200, description = "Package updated", body = PackageResponse),
        (status = 404, description = "Package not found")
    )
)]
pub async fn update_package(
    Path(package_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<UpdatePackageRequest>,
) -> GatewayResult<Json<PackageResponse>> {
    let package = state
        .packages
        .update(
            &package_id,
            &mealbox_database::UpdatePackageRequest {
                name: payload.name,
                description: payload.description,
                picture_url: payload.picture_url,
                price_cents: payload.price_cents,
            },
        )
        .await?;

    Ok(Json(PackageResponse::from(package)))
}

#[utoipa::path(
    delete,
    path = "/api/packages/{package_id}",
    tag = "Packages",
    params(("package_id" = String, Path, description = "Package public ID")),
    responses(
        (status = 204, description = "Package deleted"),
        (status = 404, description = "Package not found")
    )
)]
pub async fn delete_package(
    Path(package_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<impl IntoResponse> {
    state.packages.delete(&package_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
