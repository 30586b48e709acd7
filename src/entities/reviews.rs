use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 商品评价；(order_no, sku_id) 唯一，保证一单一评
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub order_no: String,
    pub sku_id: i64,
    pub product_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// JSON 数组字符串
    #[sea_orm(column_type = "Text", nullable)]
    pub images: Option<String>,
    pub star: i32,
    pub user_nickname: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_avatar: Option<String>,
    pub sku_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
