use crate::database::DbPool;
use crate::entities::{order_entity, order_item_entity, OrderStatus};
use crate::error::{AppError, AppResult};
use crate::models::{CreateOrderResponse, OrderInfo};
use crate::mq::DelayPublisher;
use crate::services::{AddressService, CartService, InventoryService, ProductService};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};

/// 普通订单号：纳秒时间戳拼用户ID
pub fn standard_order_no(user_id: i64) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{nanos}{user_id}")
}

/// 秒杀订单号是 (用户, 商品) 的确定性函数。
/// 同一个用户对同一个商品只会生成一个订单号，
/// 数据库的唯一索引会阻止重复插入。
pub fn seckill_order_no(user_id: i64, sku_id: i64) -> String {
    format!("SK-{user_id}-{sku_id}")
}

pub(crate) fn compute_total(lines: &[(Decimal, i32)]) -> Decimal {
    lines
        .iter()
        .map(|(price, quantity)| *price * Decimal::from(*quantity))
        .sum()
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 写入订单时的行快照
struct LineSnapshot {
    product_id: i64,
    sku_id: i64,
    product_name: String,
    sku_name: String,
    price: Decimal,
    quantity: i32,
    picture: Option<String>,
}

#[derive(Clone)]
pub struct OrderService {
    pool: DbPool,
    inventory: InventoryService,
    cart: CartService,
    address: AddressService,
    product: ProductService,
    delay: Option<DelayPublisher>,
}

impl OrderService {
    pub fn new(
        pool: DbPool,
        inventory: InventoryService,
        cart: CartService,
        address: AddressService,
        product: ProductService,
        delay: Option<DelayPublisher>,
    ) -> Self {
        Self {
            pool,
            inventory,
            cart,
            address,
            product,
            delay,
        }
    }

    /// 普通下单：地址校验 -> 购物车取数 -> 逐行快照并扣库存 ->
    /// 单事务写入订单与明细 -> 清购物车、发延迟消息。
    /// 任何一行失败都会把先前已扣的库存补偿回去再返回错误，
    /// 调用方不会看到半完成的副作用。
    pub async fn create_order(
        &self,
        user_id: i64,
        address_id: i64,
        sku_ids: &[i64],
    ) -> AppResult<CreateOrderResponse> {
        if address_id <= 0 {
            return Err(AppError::InvalidArgument("必须选择收货地址".to_string()));
        }
        if sku_ids.is_empty() {
            return Err(AppError::InvalidArgument("未选择任何商品".to_string()));
        }

        let addr = self.address.get(address_id, Some(user_id)).await?;

        let cart_items = self.cart.list(user_id).await?;
        if cart_items.is_empty() {
            return Err(AppError::InvalidArgument("购物车为空".to_string()));
        }

        let selected: Vec<_> = cart_items
            .into_iter()
            .filter(|item| sku_ids.contains(&item.sku_id))
            .collect();
        if selected.is_empty() {
            return Err(AppError::InvalidArgument("选中的商品无效".to_string()));
        }

        // 逐行取价格快照并扣库存。扣减发生在订单落库之前，
        // 失败路径必须自己负责补偿。
        let mut decremented: Vec<(i64, i32)> = Vec::new();
        let mut lines: Vec<LineSnapshot> = Vec::new();
        let mut failure: Option<AppError> = None;

        for item in &selected {
            let detail = match self.product.get_product(item.sku_id).await {
                Ok(d) => d,
                Err(AppError::NotFound(_)) => {
                    failure = Some(AppError::NotFound(format!(
                        "商品 SKU {} 不存在",
                        item.sku_id
                    )));
                    break;
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            };

            if let Err(e) = self.inventory.decrease(item.sku_id, item.quantity).await {
                failure = Some(match e {
                    AppError::FailedPrecondition(_) => {
                        AppError::FailedPrecondition(format!("商品 {} 库存不足", detail.name))
                    }
                    other => other,
                });
                break;
            }
            decremented.push((item.sku_id, item.quantity));

            lines.push(LineSnapshot {
                product_id: detail.id,
                sku_id: detail.sku_id,
                product_name: detail.name,
                sku_name: detail.sku_name,
                price: detail.price,
                quantity: item.quantity,
                picture: detail.picture,
            });
        }

        if let Some(err) = failure {
            self.compensate_decrements(&decremented).await;
            return Err(err);
        }

        let total = compute_total(
            &lines
                .iter()
                .map(|l| (l.price, l.quantity))
                .collect::<Vec<_>>(),
        );
        let order_no = standard_order_no(user_id);

        if let Err(e) = self
            .insert_order_with_items(
                &order_no,
                user_id,
                total,
                &addr.name,
                &addr.mobile,
                &addr.full_address(),
                lines,
            )
            .await
        {
            self.compensate_decrements(&decremented).await;
            return Err(e.into());
        }

        // 以下都是 best-effort：失败只记日志，不影响下单结果
        for item in &selected {
            if let Err(e) = self.cart.delete_item(user_id, item.sku_id).await {
                log::warn!("清理购物车失败: user={user_id} sku={}: {e}", item.sku_id);
            }
        }
        self.publish_delay(&order_no).await;

        Ok(CreateOrderResponse {
            order_no,
            total_amount: total,
        })
    }

    /// 秒杀落库（消费侧调用，必须幂等）。
    pub async fn create_seckill_order(&self, user_id: i64, sku_id: i64) -> AppResult<()> {
        let order_no = seckill_order_no(user_id, sku_id);

        // 先查一次挡住大多数重复消息；并发下的最后防线是唯一索引
        let exists = order_entity::Entity::find()
            .filter(order_entity::Column::OrderNo.eq(order_no.as_str()))
            .one(&self.pool)
            .await?;
        if exists.is_some() {
            log::info!("订单 {order_no} 已存在，忽略重复消息");
            return Ok(());
        }

        // 无收货地址时使用兜底地址，不让秒杀订单卡在地址上
        let (receiver_name, receiver_mobile, receiver_address) =
            match self.address.list(user_id).await {
                Ok(addrs) if !addrs.is_empty() => {
                    let addr = &addrs[0];
                    (addr.name.clone(), addr.mobile.clone(), addr.full_address())
                }
                Ok(_) => {
                    log::info!("用户 {user_id} 无收货地址，使用默认测试地址");
                    synthetic_receiver(user_id)
                }
                Err(e) => {
                    log::warn!("查询用户 {user_id} 地址失败，使用默认测试地址: {e}");
                    synthetic_receiver(user_id)
                }
            };

        let detail = self.product.get_product(sku_id).await?;

        let line = LineSnapshot {
            product_id: detail.id,
            sku_id: detail.sku_id,
            product_name: detail.name,
            sku_name: detail.sku_name,
            price: detail.price,
            quantity: 1,
            picture: detail.picture,
        };

        if let Err(e) = self
            .insert_order_with_items(
                &order_no,
                user_id,
                detail.price,
                &receiver_name,
                &receiver_mobile,
                &receiver_address,
                vec![line],
            )
            .await
        {
            if is_unique_violation(&e) {
                log::info!("订单 {order_no} 并发重复插入，按成功处理");
                return Ok(());
            }
            return Err(e.into());
        }

        // 秒杀订单同样需要超时取消，否则名额永远被占用
        self.publish_delay(&order_no).await;
        Ok(())
    }

    /// 标记支付成功。以 PENDING 为前置条件的条件更新保证
    /// 并发下至多发生一次迁移；已是 PAID 时幂等返回成功。
    pub async fn mark_paid(&self, order_no: &str) -> AppResult<()> {
        let res = order_entity::Entity::update_many()
            .col_expr(order_entity::Column::Status, Expr::value(OrderStatus::Paid))
            .col_expr(order_entity::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order_entity::Column::OrderNo.eq(order_no))
            .filter(order_entity::Column::Status.eq(OrderStatus::Pending))
            .exec(&self.pool)
            .await?;

        if res.rows_affected == 0 {
            let order = order_entity::Entity::find()
                .filter(order_entity::Column::OrderNo.eq(order_no))
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("订单不存在".to_string()))?;

            return match order.status {
                OrderStatus::Paid => Ok(()),
                _ => Err(AppError::FailedPrecondition(format!(
                    "订单状态为 {}，无法支付",
                    order.status.code()
                ))),
            };
        }

        log::info!("订单 {order_no} 支付成功");
        Ok(())
    }

    /// 取消订单（RPC 与超时消费共用）。
    /// caller 非空时校验归属；内部/超时路径不带 caller。
    /// 非 PENDING 订单直接按成功返回，覆盖重复取消与支付后到期。
    pub async fn cancel(&self, order_no: &str, caller: Option<i64>) -> AppResult<()> {
        let order = order_entity::Entity::find()
            .filter(order_entity::Column::OrderNo.eq(order_no))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("订单不存在".to_string()))?;

        if let Some(user_id) = caller {
            if order.user_id != user_id {
                return Err(AppError::PermissionDenied("不是您的订单".to_string()));
            }
        }

        if order.status != OrderStatus::Pending {
            log::info!(
                "订单 {order_no} 状态为 {}，跳过取消",
                order.status.code()
            );
            return Ok(());
        }

        let res = order_entity::Entity::update_many()
            .col_expr(
                order_entity::Column::Status,
                Expr::value(OrderStatus::Cancelled),
            )
            .col_expr(order_entity::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order_entity::Column::OrderNo.eq(order_no))
            .filter(order_entity::Column::Status.eq(OrderStatus::Pending))
            .exec(&self.pool)
            .await?;

        if res.rows_affected == 0 {
            // 并发下已被支付或已被另一路取消；回滚由赢家负责
            log::info!("订单 {order_no} 已被并发迁移，跳过取消");
            return Ok(());
        }

        // 回滚失败只记日志供运营核对，订单已经权威性地取消了
        let items = order_item_entity::Entity::find()
            .filter(order_item_entity::Column::OrderId.eq(order.id))
            .all(&self.pool)
            .await?;
        for item in items {
            if let Err(e) = self.inventory.rollback(item.sku_id, item.quantity).await {
                log::error!(
                    "[严重错误] 订单 {order_no} 回滚库存失败: sku={} qty={}: {e}",
                    item.sku_id,
                    item.quantity
                );
            }
        }

        log::info!("订单 {order_no} 已成功取消");
        Ok(())
    }

    /// 发货（管理端）：PAID -> SHIPPED
    pub async fn ship(&self, order_no: &str) -> AppResult<()> {
        let res = order_entity::Entity::update_many()
            .col_expr(
                order_entity::Column::Status,
                Expr::value(OrderStatus::Shipped),
            )
            .col_expr(order_entity::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order_entity::Column::OrderNo.eq(order_no))
            .filter(order_entity::Column::Status.eq(OrderStatus::Paid))
            .exec(&self.pool)
            .await?;

        if res.rows_affected == 0 {
            let order = order_entity::Entity::find()
                .filter(order_entity::Column::OrderNo.eq(order_no))
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("订单不存在".to_string()))?;
            return Err(AppError::FailedPrecondition(format!(
                "订单状态为 {}，无法发货",
                order.status.code()
            )));
        }

        Ok(())
    }

    pub async fn list_orders(&self, user_id: i64) -> AppResult<Vec<OrderInfo>> {
        let orders = order_entity::Entity::find()
            .filter(order_entity::Column::UserId.eq(user_id))
            .order_by_desc(order_entity::Column::CreatedAt)
            .find_with_related(order_item_entity::Entity)
            .all(&self.pool)
            .await?;

        Ok(orders
            .into_iter()
            .map(|(order, items)| OrderInfo::from_parts(order, items))
            .collect())
    }

    /// 评价完成后回写明细的评价状态（评价服务的有界回调）
    pub async fn update_item_review_status(
        &self,
        order_no: &str,
        sku_id: i64,
        is_reviewed: bool,
    ) -> AppResult<()> {
        let order = order_entity::Entity::find()
            .filter(order_entity::Column::OrderNo.eq(order_no))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("订单不存在".to_string()))?;

        order_item_entity::Entity::update_many()
            .col_expr(
                order_item_entity::Column::IsReviewed,
                Expr::value(is_reviewed),
            )
            .filter(order_item_entity::Column::OrderId.eq(order.id))
            .filter(order_item_entity::Column::SkuId.eq(sku_id))
            .exec(&self.pool)
            .await?;

        Ok(())
    }

    async fn compensate_decrements(&self, decremented: &[(i64, i32)]) {
        for (sku_id, quantity) in decremented {
            if let Err(e) = self.inventory.rollback(*sku_id, *quantity).await {
                log::error!(
                    "[严重错误] 下单失败后补偿库存失败: sku={sku_id} qty={quantity}: {e}"
                );
            }
        }
    }

    async fn publish_delay(&self, order_no: &str) {
        match &self.delay {
            Some(delay) => {
                if let Err(e) = delay.publish(order_no).await {
                    log::error!("发送延迟消息失败: {order_no}: {e}");
                }
            }
            None => {
                log::warn!("RabbitMQ 未连接，订单 {order_no} 不会自动超时取消");
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_order_with_items(
        &self,
        order_no: &str,
        user_id: i64,
        total: Decimal,
        receiver_name: &str,
        receiver_mobile: &str,
        receiver_address: &str,
        lines: Vec<LineSnapshot>,
    ) -> Result<(), sea_orm::DbErr> {
        let txn = self.pool.begin().await?;

        let order = order_entity::ActiveModel {
            order_no: Set(order_no.to_string()),
            user_id: Set(user_id),
            total_amount: Set(total),
            status: Set(OrderStatus::Pending),
            receiver_name: Set(receiver_name.to_string()),
            receiver_mobile: Set(receiver_mobile.to_string()),
            receiver_address: Set(receiver_address.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let item_models: Vec<order_item_entity::ActiveModel> = lines
            .into_iter()
            .map(|line| order_item_entity::ActiveModel {
                order_id: Set(order.id),
                product_id: Set(line.product_id),
                sku_id: Set(line.sku_id),
                product_name: Set(line.product_name),
                sku_name: Set(line.sku_name),
                price: Set(line.price),
                quantity: Set(line.quantity),
                picture: Set(line.picture),
                is_reviewed: Set(false),
                ..Default::default()
            })
            .collect();

        order_item_entity::Entity::insert_many(item_models)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }
}

fn synthetic_receiver(user_id: i64) -> (String, String, String) {
    (
        format!("秒杀用户{user_id}"),
        "13800008888".to_string(),
        "秒杀专用通道虚拟地址".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_seckill_order_no_is_deterministic() {
        assert_eq!(seckill_order_no(42, 9), "SK-42-9");
        assert_eq!(seckill_order_no(42, 9), seckill_order_no(42, 9));
        assert_ne!(seckill_order_no(42, 9), seckill_order_no(42, 10));
        assert_ne!(seckill_order_no(42, 9), seckill_order_no(43, 9));
    }

    #[test]
    fn test_standard_order_no_embeds_user() {
        let no = standard_order_no(1001);
        assert!(no.ends_with("1001"));
        // 时间戳部分必须是纯数字
        assert!(no.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_total_is_price_snapshot_times_quantity() {
        let total = compute_total(&[(dec!(4.50), 3)]);
        assert_eq!(total, dec!(13.50));
    }

    #[test]
    fn test_total_sums_multiple_lines() {
        let total = compute_total(&[(dec!(4.50), 3), (dec!(9.99), 1), (dec!(0.01), 100)]);
        assert_eq!(total, dec!(24.49));
    }

    #[test]
    fn test_empty_order_total_is_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_synthetic_receiver_shape() {
        let (name, mobile, addr) = synthetic_receiver(7);
        assert_eq!(name, "秒杀用户7");
        assert_eq!(mobile, "13800008888");
        assert!(!addr.is_empty());
    }
}
