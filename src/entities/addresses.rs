use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub mobile: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
    pub is_default: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 收货地址快照：省市区+详细地址拼接
    pub fn full_address(&self) -> String {
        format!(
            "{}{}{}{}",
            self.province, self.city, self.district, self.detail_address
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_address_concatenation() {
        let m = Model {
            id: 1,
            user_id: 1,
            name: "张三".to_string(),
            mobile: "13800000000".to_string(),
            province: "广东省".to_string(),
            city: "深圳市".to_string(),
            district: "南山区".to_string(),
            detail_address: "科技园路1号".to_string(),
            is_default: false,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(m.full_address(), "广东省深圳市南山区科技园路1号");
    }
}
