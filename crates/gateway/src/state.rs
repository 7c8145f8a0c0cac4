//! Shared application state for the gateway

use crate::error::{GatewayError, GatewayResult};
use mealbox_config::{AppConfig, InboxConfig};
use mealbox_database::{
    CategoryRepository, ConversationRepository, FoodRepository, MessageRepository,
    OrderingRepository, PackageRepository, RestaurantRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state containing the repositories every handler needs.
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Inbox paging configuration
    pub inbox: InboxConfig,
    pub restaurants: Arc<RestaurantRepository>,
    pub categories: Arc<CategoryRepository>,
    pub foods: Arc<FoodRepository>,
    pub packages: Arc<PackageRepository>,
    pub ordering: Arc<OrderingRepository>,
    pub conversations: Arc<ConversationRepository>,
    pub messages: Arc<MessageRepository>,
}

impl GatewayState {
    /// Create a new gateway state around an existing pool.
    pub fn new(pool: SqlitePool, inbox: InboxConfig) -> Self {
        Self {
            restaurants: Arc::new(RestaurantRepository::new(pool.clone())),
            categories: Arc::new(CategoryRepository::new(pool.clone())),
            foods: Arc::new(FoodRepository::new(pool.clone())),
            packages: Arc::new(PackageRepository::new(pool.clone())),
            ordering: Arc::new(OrderingRepository::new(pool.clone())),
            conversations: Arc::new(ConversationRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool.clone())),
            inbox,
            pool,
        }
    }

    /// Create gateway state from application configuration.
    pub async fn from_config(config: &AppConfig) -> GatewayResult<Self> {
        let pool = mealbox_database::initialize_database(&config.database)
            .await
            .map_err(|e| {
                GatewayError::InternalError(format!("failed to initialize database: {e}"))
            })?;

        Ok(Self::new(pool, config.inbox.clone()))
    }

    /// Resolve a requested page size against the configured bounds.
    pub fn page_size(&self, requested: Option<i64>) -> i64 {
        match requested {
            Some(limit) if limit > 0 => limit.min(self.inbox.max_page_size),
            _ => self.inbox.default_page_size,
        }
    }
}
