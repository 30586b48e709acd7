pub mod address;
pub mod admin;
pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;
pub mod user;

pub use address::address_config;
pub use admin::admin_config;
pub use cart::cart_config;
pub use order::order_config;
pub use payment::payment_config;
pub use product::product_config;
pub use review::review_config;
pub use user::user_config;

use crate::error::AppError;
use actix_web::{HttpMessage, HttpRequest};

/// 鉴权中间件会把用户ID写进请求扩展；公开路径上拿不到
pub(crate) fn current_user_id(req: &HttpRequest) -> Result<i64, AppError> {
    req.extensions()
        .get::<i64>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}
