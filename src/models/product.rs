use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub category_id: Option<i64>,
    /// 非空时走全文检索路径
    pub query: Option<String>,
}

impl ProductQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(10).clamp(1, 100)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.page_size()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductInfo {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub picture: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductInfo>,
    pub total: u64,
}

/// 商品详情以 SKU 为入口，价格取 SKU 价格
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub picture: Option<String>,
    pub price: Decimal,
    pub sku_id: i64,
    pub sku_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductDetailQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SeckillRequest {
    pub sku_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeckillResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pagination_defaults() {
        let q = ProductQuery {
            page: None,
            page_size: None,
            category_id: None,
            query: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), 10);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_query_offset() {
        let q = ProductQuery {
            page: Some(3),
            page_size: Some(20),
            category_id: None,
            query: None,
        };
        assert_eq!(q.offset(), 40);
    }
}
