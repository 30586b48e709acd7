pub mod address_service;
pub mod admin_service;
pub mod cart_service;
pub mod inventory_service;
pub mod order_service;
pub mod payment_service;
pub mod product_service;
pub mod review_service;
pub mod seckill_gate;
pub mod user_service;

pub use address_service::*;
pub use admin_service::*;
pub use cart_service::*;
pub use inventory_service::*;
pub use order_service::*;
pub use payment_service::*;
pub use product_service::*;
pub use review_service::*;
pub use seckill_gate::*;
pub use user_service::*;
