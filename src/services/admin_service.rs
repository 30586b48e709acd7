use crate::database::DbPool;
use crate::entities::{order_entity, product_entity, sku_entity, user_entity};
use crate::error::{AppError, AppResult};
use crate::models::{
    AdminListQuery, AdminSkuInfo, AdminSkuListResponse, AdminUserInfo, AdminUserListResponse,
    CategoryStat, StatsResponse, TrendStat,
};
use crate::services::{OrderService, SeckillGate};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ConnectionTrait, DbBackend, EntityTrait, IntoActiveModel, PaginatorTrait, QueryOrder,
    QuerySelect, Set, Statement,
};

#[derive(Clone)]
pub struct AdminService {
    pool: DbPool,
    orders: OrderService,
    gate: SeckillGate,
}

impl AdminService {
    pub fn new(pool: DbPool, orders: OrderService, gate: SeckillGate) -> Self {
        Self { pool, orders, gate }
    }

    /// 仪表盘统计。销售额只统计已支付与已发货的订单。
    pub async fn dashboard_stats(&self) -> AppResult<StatsResponse> {
        let total_sales: Decimal = {
            let stmt = Statement::from_string(
                DbBackend::MySql,
                "SELECT CAST(COALESCE(SUM(total_amount), 0) AS DECIMAL(12, 2)) AS total \
                 FROM orders WHERE status IN (1, 3)",
            );
            match self.pool.query_one(stmt).await? {
                Some(row) => row.try_get("", "total")?,
                None => Decimal::ZERO,
            }
        };

        let order_count = order_entity::Entity::find().count(&self.pool).await?;
        let user_count = user_entity::Entity::find().count(&self.pool).await?;
        let product_count = product_entity::Entity::find().count(&self.pool).await?;

        // 品类分布
        let mut category_stats = Vec::new();
        let stmt = Statement::from_string(
            DbBackend::MySql,
            "SELECT COALESCE(c.name, '未分类') AS name, COUNT(p.id) AS value \
             FROM products p LEFT JOIN categories c ON c.id = p.category_id \
             GROUP BY c.name",
        );
        for row in self.pool.query_all(stmt).await? {
            category_stats.push(CategoryStat {
                name: row.try_get("", "name")?,
                value: row.try_get("", "value")?,
            });
        }

        // 最近 7 天销售趋势
        let mut sales_trend = Vec::new();
        let since = Utc::now() - Duration::days(7);
        let stmt = Statement::from_sql_and_values(
            DbBackend::MySql,
            "SELECT DATE_FORMAT(created_at, '%m-%d') AS date, SUM(total_amount) AS amount \
             FROM orders WHERE created_at > ? AND status IN (1, 3) \
             GROUP BY date ORDER BY date ASC",
            [since.into()],
        );
        for row in self.pool.query_all(stmt).await? {
            sales_trend.push(TrendStat {
                date: row.try_get("", "date")?,
                amount: row.try_get("", "amount")?,
            });
        }

        Ok(StatsResponse {
            total_sales,
            order_count,
            user_count,
            product_count,
            category_stats,
            sales_trend,
        })
    }

    pub async fn list_users(&self, query: &AdminListQuery) -> AppResult<AdminUserListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

        let total = user_entity::Entity::find().count(&self.pool).await?;
        let users = user_entity::Entity::find()
            .order_by_asc(user_entity::Column::Id)
            .offset((page - 1) * page_size)
            .limit(page_size)
            .all(&self.pool)
            .await?;

        let users = users
            .into_iter()
            .map(|u| AdminUserInfo {
                id: u.id,
                username: u.username,
                nickname: u.nickname,
                mobile: u.mobile,
                role: u.role,
                is_disabled: u.is_disabled,
                created_at: u
                    .created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(AdminUserListResponse { users, total })
    }

    pub async fn toggle_user(&self, user_id: i64, disabled: bool) -> AppResult<()> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        let mut am = user.into_active_model();
        am.is_disabled = Set(disabled);
        user_entity::Entity::update(am).exec(&self.pool).await?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        user_entity::Entity::delete_by_id(user_id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    /// 商品管理视图按 SKU 粒度列出，带所属商品名
    pub async fn list_skus(&self, query: &AdminListQuery) -> AppResult<AdminSkuListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

        let total = sku_entity::Entity::find().count(&self.pool).await?;
        let rows = sku_entity::Entity::find()
            .find_also_related(product_entity::Entity)
            .order_by_asc(sku_entity::Column::Id)
            .offset((page - 1) * page_size)
            .limit(page_size)
            .all(&self.pool)
            .await?;

        let skus = rows
            .into_iter()
            .map(|(sku, product)| AdminSkuInfo {
                sku_id: sku.id,
                product_id: sku.product_id,
                name: product.map(|p| p.name).unwrap_or_default(),
                sku_name: sku.name,
                price: sku.price,
                stock: sku.stock,
            })
            .collect();

        Ok(AdminSkuListResponse { skus, total })
    }

    /// 运营直接设置价格与库存（目录维护，不走扣减协议）
    pub async fn update_sku(&self, sku_id: i64, price: Decimal, stock: i32) -> AppResult<()> {
        if stock < 0 {
            return Err(AppError::InvalidArgument("库存不能为负".to_string()));
        }

        let sku = sku_entity::Entity::find_by_id(sku_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sku 不存在: {sku_id}")))?;

        let mut am = sku.into_active_model();
        am.price = Set(price);
        am.stock = Set(stock);
        sku_entity::Entity::update(am).exec(&self.pool).await?;
        Ok(())
    }

    pub async fn ship_order(&self, order_no: &str) -> AppResult<()> {
        self.orders.ship(order_no).await
    }

    /// 秒杀预热：设置准入配额并清空中签集合
    pub async fn arm_seckill(&self, sku_id: i64, quota: i64) -> AppResult<()> {
        if quota < 0 {
            return Err(AppError::InvalidArgument("配额不能为负".to_string()));
        }
        self.gate.arm(sku_id, quota).await?;
        log::info!("[Seckill] SKU {sku_id} 预热完成，配额 {quota}");
        Ok(())
    }

    pub async fn disarm_seckill(&self, sku_id: i64) -> AppResult<()> {
        self.gate.disarm(sku_id).await?;
        log::info!("[Seckill] SKU {sku_id} 活动已下线");
        Ok(())
    }
}
