//! Repository implementations for the Mealbox database

pub mod category_repository;
pub mod conversation_repository;
pub mod food_repository;
pub mod message_repository;
pub mod ordering;
pub mod package_repository;
pub mod restaurant_repository;

pub use category_repository::CategoryRepository;
pub use conversation_repository::ConversationRepository;
pub use food_repository::FoodRepository;
pub use message_repository::MessageRepository;
pub use ordering::{next_sort_order, OrderedCollection, OrderingRepository, ReorderItem};
pub use package_repository::PackageRepository;
pub use restaurant_repository::RestaurantRepository;
