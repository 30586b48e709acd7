use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayRequest {
    pub order_no: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PayResponse {
    pub success: bool,
    pub transaction_id: String,
}
