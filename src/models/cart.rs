use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub sku_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartAddRequest {
    pub sku_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartDeleteRequest {
    pub sku_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartListResponse {
    pub items: Vec<CartItem>,
}
