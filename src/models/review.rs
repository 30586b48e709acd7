use crate::entities::review_entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddReviewRequest {
    pub order_no: String,
    pub sku_id: i64,
    pub content: String,
    pub star: i32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub user_nickname: Option<String>,
    #[serde(default)]
    pub user_avatar: Option<String>,
    #[serde(default)]
    pub sku_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewListQuery {
    pub product_id: i64,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewStatusQuery {
    pub order_no: String,
    pub sku_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewInfo {
    pub id: i64,
    pub user_id: i64,
    pub user_nickname: Option<String>,
    pub user_avatar: Option<String>,
    pub content: String,
    pub star: i32,
    pub images: Vec<String>,
    pub sku_name: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewInfo>,
    pub total: u64,
    pub average_star: f32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewStatusResponse {
    pub has_reviewed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddReviewResponse {
    pub review_id: i64,
}

impl From<review_entity::Model> for ReviewInfo {
    fn from(m: review_entity::Model) -> Self {
        let images: Vec<String> = m
            .images
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        Self {
            id: m.id,
            user_id: m.user_id,
            user_nickname: m.user_nickname,
            user_avatar: m.user_avatar,
            content: m.content,
            star: m.star,
            images,
            sku_name: m.sku_name,
            created_at: m
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }
}
