use crate::error::AppResult;
use crate::models::CartItem;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

pub fn cart_key(user_id: i64) -> String {
    format!("cart:{user_id}")
}

/// 购物车存放在 Redis Hash 里：field 为 sku_id，value 为数量。
/// 重复加购用 HINCRBY 累加；传负数即减少数量。
#[derive(Clone)]
pub struct CartService {
    redis: ConnectionManager,
}

impl CartService {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    pub async fn add_item(&self, user_id: i64, sku_id: i64, quantity: i32) -> AppResult<()> {
        let mut conn = self.redis.clone();
        let new_qty: i64 = conn
            .hincr(cart_key(user_id), sku_id.to_string(), quantity as i64)
            .await?;
        // 减到 0 以下就直接移除该 SKU
        if new_qty <= 0 {
            let _: i64 = conn.hdel(cart_key(user_id), sku_id.to_string()).await?;
        }
        Ok(())
    }

    pub async fn delete_item(&self, user_id: i64, sku_id: i64) -> AppResult<()> {
        let mut conn = self.redis.clone();
        let _: i64 = conn.hdel(cart_key(user_id), sku_id.to_string()).await?;
        Ok(())
    }

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<CartItem>> {
        let mut conn = self.redis.clone();
        let entries: std::collections::HashMap<String, i64> =
            conn.hgetall(cart_key(user_id)).await?;

        let mut items: Vec<CartItem> = entries
            .into_iter()
            .filter_map(|(sku, qty)| {
                sku.parse::<i64>().ok().map(|sku_id| CartItem {
                    sku_id,
                    quantity: qty as i32,
                })
            })
            .collect();
        items.sort_by_key(|i| i.sku_id);
        Ok(items)
    }

    pub async fn empty(&self, user_id: i64) -> AppResult<()> {
        let mut conn = self.redis.clone();
        let _: i64 = conn.del(cart_key(user_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_key_layout() {
        assert_eq!(cart_key(1001), "cart:1001");
    }
}
