//! Meal package entity definitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: i64,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: Option<i64>,
}
