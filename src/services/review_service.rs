use crate::database::DbPool;
use crate::entities::review_entity;
use crate::error::{AppError, AppResult};
use crate::models::{AddReviewRequest, ReviewInfo, ReviewListQuery, ReviewListResponse};
use crate::services::{OrderService, ProductService};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};

#[derive(Clone)]
pub struct ReviewService {
    pool: DbPool,
    orders: OrderService,
    product: ProductService,
}

impl ReviewService {
    pub fn new(pool: DbPool, orders: OrderService, product: ProductService) -> Self {
        Self {
            pool,
            orders,
            product,
        }
    }

    pub async fn add_review(&self, user_id: i64, req: AddReviewRequest) -> AppResult<i64> {
        if req.content.is_empty() {
            return Err(AppError::InvalidArgument("评价内容不能为空".to_string()));
        }
        if !(1..=5).contains(&req.star) {
            return Err(AppError::InvalidArgument("星级必须在1-5之间".to_string()));
        }

        // 拿着 sku_id 反查真实的 product_id，查不到就降级用 sku_id
        let product_id = match self.product.get_product(req.sku_id).await {
            Ok(detail) => detail.id,
            Err(_) => req.sku_id,
        };

        let images = serde_json::to_string(&req.images)?;
        let review = review_entity::ActiveModel {
            user_id: Set(user_id),
            order_no: Set(req.order_no.clone()),
            sku_id: Set(req.sku_id),
            product_id: Set(product_id),
            content: Set(req.content),
            star: Set(req.star),
            images: Set(Some(images)),
            user_nickname: Set(req.user_nickname),
            user_avatar: Set(req.user_avatar),
            sku_name: Set(req.sku_name),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        let review = match review {
            Ok(r) => r,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AppError::AlreadyExists("该商品已评价过".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        // 有界回调订单服务更新明细的评价状态；失败不拦截评价结果
        if let Err(e) = self
            .orders
            .update_item_review_status(&req.order_no, req.sku_id, true)
            .await
        {
            log::error!("[Critical] 回写订单评价状态失败: {e}");
        }

        Ok(review.id)
    }

    pub async fn list_reviews(&self, query: &ReviewListQuery) -> AppResult<ReviewListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

        let find = review_entity::Entity::find()
            .filter(review_entity::Column::ProductId.eq(query.product_id));

        let total = find.clone().count(&self.pool).await?;

        let reviews = find
            .order_by_desc(review_entity::Column::CreatedAt)
            .offset((page - 1) * page_size)
            .limit(page_size)
            .all(&self.pool)
            .await?;

        let total_star: i64 = reviews.iter().map(|r| r.star as i64).sum();
        let average_star = if reviews.is_empty() {
            5.0
        } else {
            total_star as f32 / reviews.len() as f32
        };

        Ok(ReviewListResponse {
            reviews: reviews.into_iter().map(ReviewInfo::from).collect(),
            total,
            average_star,
        })
    }

    pub async fn has_reviewed(
        &self,
        user_id: i64,
        order_no: &str,
        sku_id: i64,
    ) -> AppResult<bool> {
        let count = review_entity::Entity::find()
            .filter(review_entity::Column::UserId.eq(user_id))
            .filter(review_entity::Column::OrderNo.eq(order_no))
            .filter(review_entity::Column::SkuId.eq(sku_id))
            .count(&self.pool)
            .await?;
        Ok(count > 0)
    }
}
