//! REST API endpoints for the gateway

pub mod categories;
pub mod conversations;
pub mod foods;
pub mod health;
pub mod packages;
pub mod reorder;
pub mod restaurants;

use crate::state::GatewayState;
use axum::Router;
use std::sync::Arc;

/// Create all REST API routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(restaurants::create_restaurant_routes())
        .merge(categories::create_category_routes())
        .merge(foods::create_food_routes())
        .merge(packages::create_package_routes())
        .merge(reorder::create_reorder_routes())
        .merge(conversations::create_conversation_routes())
}
