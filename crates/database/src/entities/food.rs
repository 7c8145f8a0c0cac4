//! Food (menu item) entity definitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub public_id: String,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFoodRequest {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: i64,
    pub calories: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFoodRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub picture_url: Option<String>,
    pub price_cents: Option<i64>,
    pub calories: Option<i64>,
    pub is_active: Option<bool>,
}
