//! # Mealbox Gateway Crate
//!
//! This crate provides the HTTP layer for Mealbox: REST routes for the
//! catalog collections and the messaging inbox, shared state wiring, and
//! error-to-status mapping.

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export main types for convenience
pub use error::{GatewayError, GatewayResult};
pub use state::GatewayState;

// Legacy export kept for the server binary
pub use create_router as build_router;

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);
    let mut router = Router::new()
        .nest("/api", rest::create_rest_routes().with_state(arc_state))
        .route("/health", get(rest::health::health_check))
        .layer(middleware::create_cors_middleware())
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    // Swagger UI is only mounted in debug builds
    #[cfg(debug_assertions)]
    {
        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::health::health_check,
                rest::restaurants::list_restaurants,
                rest::restaurants::create_restaurant,
                rest::restaurants::get_restaurant,
                rest::restaurants::update_restaurant,
                rest::restaurants::delete_restaurant,
                rest::categories::list_categories,
                rest::categories::create_category,
                rest::categories::get_category,
                rest::categories::update_category,
                rest::categories::delete_category,
                rest::foods::list_foods,
                rest::foods::create_food,
                rest::foods::get_food,
                rest::foods::update_food,
                rest::foods::delete_food,
                rest::packages::list_packages,
                rest::packages::create_package,
                rest::packages::get_package,
                rest::packages::update_package,
                rest::packages::delete_package,
                rest::reorder::reorder_restaurants,
                rest::reorder::reorder_categories,
                rest::reorder::reorder_foods,
                rest::reorder::reorder_packages,
                rest::conversations::list_conversations,
                rest::conversations::get_conversation,
                rest::conversations::send_message,
                rest::conversations::total_unread,
            ),
            components(
                schemas(
                    rest::health::HealthResponse,
                    rest::restaurants::RestaurantResponse,
                    rest::restaurants::CreateRestaurantRequest,
                    rest::restaurants::UpdateRestaurantRequest,
                    rest::categories::CategoryResponse,
                    rest::categories::CreateCategoryRequest,
                    rest::categories::UpdateCategoryRequest,
                    rest::foods::FoodResponse,
                    rest::foods::CreateFoodRequest,
                    rest::foods::UpdateFoodRequest,
                    rest::packages::PackageResponse,
                    rest::packages::CreatePackageRequest,
                    rest::packages::UpdatePackageRequest,
                    rest::reorder::ReorderRequest,
                    rest::reorder::ReorderItemPayload,
                    rest::reorder::ReorderResponse,
                    rest::conversations::ConversationResponse,
                    rest::conversations::ConversationSummaryResponse,
                    rest::conversations::ConversationDetailResponse,
                    rest::conversations::MessageResponse,
                    rest::conversations::SendMessageRequest,
                    rest::conversations::UnreadResponse,
                )
            ),
            tags(
                (name = "Restaurants", description = "Restaurant management"),
                (name = "Categories", description = "Menu category management"),
                (name = "Foods", description = "Menu item management"),
                (name = "Packages", description = "Meal package management"),
                (name = "Ordering", description = "Display-order batches"),
                (name = "Inbox", description = "Messaging inbox"),
            )
        )]
        struct ApiDoc;

        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    router
}
