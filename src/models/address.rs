use crate::entities::address_entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAddressRequest {
    pub name: String,
    pub mobile: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAddressRequest {
    pub address_id: i64,
    pub name: String,
    pub mobile: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteAddressRequest {
    pub address_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetDefaultAddressRequest {
    pub address_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressInfo {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail_address: String,
    pub is_default: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateAddressResponse {
    pub address_id: i64,
}

impl From<address_entity::Model> for AddressInfo {
    fn from(m: address_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            mobile: m.mobile,
            province: m.province,
            city: m.city,
            district: m.district,
            detail_address: m.detail_address,
            is_default: m.is_default,
        }
    }
}
