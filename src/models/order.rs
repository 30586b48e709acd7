use crate::entities::{order_entity, order_item_entity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub address_id: i64,
    pub sku_ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order_no: String,
    pub total_amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelOrderRequest {
    pub order_no: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemInfo {
    pub product_id: i64,
    pub sku_id: i64,
    pub product_name: String,
    pub sku_name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub picture: Option<String>,
    pub is_reviewed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderInfo {
    pub order_no: String,
    pub total_amount: Decimal,
    pub status: i32,
    pub receiver_name: String,
    pub receiver_mobile: String,
    pub receiver_address: String,
    pub created_at: String,
    pub items: Vec<OrderItemInfo>,
}

impl From<order_item_entity::Model> for OrderItemInfo {
    fn from(m: order_item_entity::Model) -> Self {
        Self {
            product_id: m.product_id,
            sku_id: m.sku_id,
            product_name: m.product_name,
            sku_name: m.sku_name,
            price: m.price,
            quantity: m.quantity,
            picture: m.picture,
            is_reviewed: m.is_reviewed,
        }
    }
}

impl OrderInfo {
    pub fn from_parts(order: order_entity::Model, items: Vec<order_item_entity::Model>) -> Self {
        Self {
            order_no: order.order_no,
            total_amount: order.total_amount,
            status: order.status.code(),
            receiver_name: order.receiver_name,
            receiver_mobile: order.receiver_mobile,
            receiver_address: order.receiver_address,
            created_at: order
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            items: items.into_iter().map(OrderItemInfo::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderInfo>,
}
