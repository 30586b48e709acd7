use crate::database::DbPool;
use crate::entities::address_entity;
use crate::error::{AppError, AppResult};
use crate::models::{CreateAddressRequest, UpdateAddressRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

#[derive(Clone)]
pub struct AddressService {
    pool: DbPool,
}

impl AddressService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i64, req: CreateAddressRequest) -> AppResult<i64> {
        let model = address_entity::ActiveModel {
            user_id: Set(user_id),
            name: Set(req.name),
            mobile: Set(req.mobile),
            province: Set(req.province),
            city: Set(req.city),
            district: Set(req.district),
            detail_address: Set(req.detail_address),
            is_default: Set(false),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(model.id)
    }

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<address_entity::Model>> {
        let addrs = address_entity::Entity::find()
            .filter(address_entity::Column::UserId.eq(user_id))
            .order_by_desc(address_entity::Column::IsDefault)
            .order_by_asc(address_entity::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(addrs)
    }

    /// 按 ID 取地址；传入 owner 时校验归属
    pub async fn get(
        &self,
        address_id: i64,
        owner: Option<i64>,
    ) -> AppResult<address_entity::Model> {
        let addr = address_entity::Entity::find_by_id(address_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("地址不存在".to_string()))?;

        if let Some(user_id) = owner {
            if addr.user_id != user_id {
                return Err(AppError::PermissionDenied("不是您的地址".to_string()));
            }
        }

        Ok(addr)
    }

    pub async fn update(&self, user_id: i64, req: UpdateAddressRequest) -> AppResult<()> {
        let addr = self.get(req.address_id, Some(user_id)).await?;

        let mut am = addr.into_active_model();
        am.name = Set(req.name);
        am.mobile = Set(req.mobile);
        am.province = Set(req.province);
        am.city = Set(req.city);
        am.district = Set(req.district);
        am.detail_address = Set(req.detail_address);
        am.update(&self.pool).await?;

        Ok(())
    }

    pub async fn delete(&self, user_id: i64, address_id: i64) -> AppResult<()> {
        let addr = self.get(address_id, Some(user_id)).await?;
        address_entity::Entity::delete_by_id(addr.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    /// 设置默认地址：同一事务内先清掉旧默认再置新默认
    pub async fn set_default(&self, user_id: i64, address_id: i64) -> AppResult<()> {
        let addr = self.get(address_id, Some(user_id)).await?;

        let txn = self.pool.begin().await?;

        address_entity::Entity::update_many()
            .col_expr(
                address_entity::Column::IsDefault,
                sea_orm::sea_query::Expr::value(false),
            )
            .filter(address_entity::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        let mut am = addr.into_active_model();
        am.is_default = Set(true);
        am.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
