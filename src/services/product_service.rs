use crate::database::DbPool;
use crate::entities::{product_entity, sku_entity};
use crate::error::{AppError, AppResult};
use crate::models::{ProductDetail, ProductInfo, ProductListResponse, ProductQuery};
use crate::mq::{SeckillMessage, SeckillPublisher};
use crate::services::seckill_gate::{AdmitOutcome, SeckillGate};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

#[derive(Clone)]
pub struct ProductService {
    pool: DbPool,
    gate: SeckillGate,
    seckill_publisher: Option<SeckillPublisher>,
}

impl ProductService {
    pub fn new(
        pool: DbPool,
        gate: SeckillGate,
        seckill_publisher: Option<SeckillPublisher>,
    ) -> Self {
        Self {
            pool,
            gate,
            seckill_publisher,
        }
    }

    /// 商品列表。query 非空时走模糊检索（外部的 ES 同步链路
    /// 不在本进程内，这里用 SQL 模糊匹配承接同一个入口）。
    pub async fn list_products(&self, query: &ProductQuery) -> AppResult<ProductListResponse> {
        let mut find = product_entity::Entity::find();

        if let Some(category_id) = query.category_id {
            if category_id > 0 {
                find = find.filter(product_entity::Column::CategoryId.eq(category_id));
            }
        }

        if let Some(q) = query.query.as_deref() {
            if !q.is_empty() {
                let pattern = format!("%{q}%");
                find = find.filter(
                    Condition::any()
                        .add(product_entity::Column::Name.like(pattern.clone()))
                        .add(product_entity::Column::Description.like(pattern)),
                );
            }
        }

        let total = find.clone().count(&self.pool).await?;

        let products = find
            .offset(query.offset())
            .limit(query.page_size())
            .all(&self.pool)
            .await?;

        let products = products
            .into_iter()
            .map(|p| ProductInfo {
                id: p.id,
                name: p.name,
                description: p.description,
                category_id: p.category_id,
                picture: p.picture,
                price: p.price,
            })
            .collect();

        Ok(ProductListResponse { products, total })
    }

    /// 商品详情（通过 SKU ID），价格返回 SKU 价格
    pub async fn get_product(&self, sku_id: i64) -> AppResult<ProductDetail> {
        let sku = sku_entity::Entity::find_by_id(sku_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sku 不存在: {sku_id}")))?;

        let product = product_entity::Entity::find_by_id(sku.product_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("商品不存在: {}", sku.product_id)))?;

        Ok(ProductDetail {
            id: product.id,
            name: product.name,
            description: product.description,
            category_id: product.category_id,
            picture: sku.picture.or(product.picture),
            price: sku.price,
            sku_id: sku.id,
            sku_name: sku.name,
        })
    }

    /// 秒杀：准入门判定，中签后发消息异步下单。
    /// 准入门是活动配额的唯一权威，这条路径不扣 DB 库存。
    pub async fn seckill(&self, user_id: i64, sku_id: i64) -> AppResult<()> {
        match self.gate.admit(sku_id, user_id).await? {
            AdmitOutcome::Won => {
                log::info!("[Seckill] User {user_id} 抢到了 SKU {sku_id}!");
                match &self.seckill_publisher {
                    Some(publisher) => {
                        let msg = SeckillMessage { user_id, sku_id };
                        if let Err(e) = publisher.publish(&msg).await {
                            // 名额已被占用但订单无法生成，交给运营核对
                            log::error!(
                                "[严重] 秒杀消息投递失败: User={user_id} SKU={sku_id}: {e}"
                            );
                            return Err(AppError::Unavailable(
                                "下单通道暂时不可用".to_string(),
                            ));
                        }
                        Ok(())
                    }
                    None => {
                        log::error!("[严重] RabbitMQ 未连接，秒杀订单无法生成");
                        Err(AppError::Unavailable("下单通道暂时不可用".to_string()))
                    }
                }
            }
            AdmitOutcome::SoldOut => Err(AppError::ResourceExhausted(
                "手慢了，已被抢光".to_string(),
            )),
            AdmitOutcome::Duplicate => {
                Err(AppError::AlreadyExists("您已经抢购过了".to_string()))
            }
            AdmitOutcome::NotArmed => Err(AppError::FailedPrecondition(
                "秒杀活动未开始 (库存未预热)".to_string(),
            )),
        }
    }
}
