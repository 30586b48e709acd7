use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryStat {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrendStat {
    pub date: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_sales: Decimal,
    pub order_count: u64,
    pub user_count: u64,
    pub product_count: u64,
    pub category_stats: Vec<CategoryStat>,
    pub sales_trend: Vec<TrendStat>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserInfo {
    pub id: i64,
    pub username: String,
    pub nickname: Option<String>,
    pub mobile: Option<String>,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserListResponse {
    pub users: Vec<AdminUserInfo>,
    pub total: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleUserRequest {
    pub user_id: i64,
    pub disabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSkuInfo {
    pub sku_id: i64,
    pub product_id: i64,
    pub name: String,
    pub sku_name: String,
    pub price: Decimal,
    pub stock: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSkuListResponse {
    pub skus: Vec<AdminSkuInfo>,
    pub total: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSkuRequest {
    pub sku_id: i64,
    pub price: Decimal,
    pub stock: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShipOrderRequest {
    pub order_no: String,
}

/// 秒杀预热：写入准入配额，清空已中签集合
#[derive(Debug, Deserialize, ToSchema)]
pub struct ArmSeckillRequest {
    pub sku_id: i64,
    pub quota: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DisarmSeckillRequest {
    pub sku_id: i64,
}
