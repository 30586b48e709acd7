use crate::database::DbPool;
use crate::entities::sku_entity;
use crate::error::{AppError, AppResult};
use sea_orm::{EntityTrait, IntoActiveModel, QuerySelect, Set, TransactionTrait};

/// SKU 库存的唯一写入方。两个操作都在自己的事务内
/// 以 SELECT ... FOR UPDATE 取行锁，同一 SKU 上的扣减
/// 与回滚因此串行化，库存不会被读到负数。
#[derive(Clone)]
pub struct InventoryService {
    pool: DbPool,
}

impl InventoryService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// 扣减库存，用于普通下单。库存不足时整个事务回滚。
    pub async fn decrease(&self, sku_id: i64, count: i32) -> AppResult<()> {
        if count < 1 {
            return Err(AppError::InvalidArgument("扣减数量必须大于0".to_string()));
        }

        let txn = self.pool.begin().await?;

        let sku = sku_entity::Entity::find_by_id(sku_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sku 不存在: {sku_id}")))?;

        if sku.stock < count {
            txn.rollback().await?;
            return Err(AppError::FailedPrecondition("库存不足".to_string()));
        }

        let new_stock = sku.stock - count;
        let mut am = sku.into_active_model();
        am.stock = Set(new_stock);
        sku_entity::Entity::update(am).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// 回滚库存，用于取消订单。无前置条件，无条件加回。
    pub async fn rollback(&self, sku_id: i64, count: i32) -> AppResult<()> {
        if count < 1 {
            return Err(AppError::InvalidArgument("回滚数量必须大于0".to_string()));
        }

        let txn = self.pool.begin().await?;

        let sku = sku_entity::Entity::find_by_id(sku_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sku 不存在: {sku_id}")))?;

        let new_stock = sku.stock + count;
        let mut am = sku.into_active_model();
        am.stock = Set(new_stock);
        sku_entity::Entity::update(am).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
