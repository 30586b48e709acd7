pub mod addresses;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod skus;
pub mod users;

pub use addresses as address_entity;
pub use categories as category_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use products as product_entity;
pub use reviews as review_entity;
pub use skus as sku_entity;
pub use users as user_entity;

// Re-export enums/types that are shared
pub use orders::OrderStatus;
