use crate::error::{AppError, AppResult};
use redis::aio::ConnectionManager;
use redis::Script;
use std::sync::Arc;

/// Lua 脚本：原子抢购准入
/// KEYS[1]: 库存计数 (stock:<sku_id>)
/// KEYS[2]: 中签用户集合 (winners:<sku_id>)
/// ARGV[1]: 用户ID
/// 返回: 1=抢购成功, 0=库存不足, -1=重复抢购, -2=未预热
const ADMIT_SCRIPT: &str = r#"
local stockKey = KEYS[1]
local winnersKey = KEYS[2]
local userId = ARGV[1]

-- 1. 检查用户是否已抢购 (去重)
if redis.call("SISMEMBER", winnersKey, userId) == 1 then
    return -1
end

-- 2. 检查库存
local stock = tonumber(redis.call("GET", stockKey))
if stock == nil then
    return -2
end
if stock <= 0 then
    return 0
end

-- 3. 扣减库存并记录用户
redis.call("DECR", stockKey)
redis.call("SADD", winnersKey, userId)
return 1
"#;

/// 准入结果；脚本在 Redis 单线程命令处理器内一步完成判重、
/// 查库存与双写，任意并发下互不交错。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    Won,
    SoldOut,
    Duplicate,
    NotArmed,
}

impl AdmitOutcome {
    fn from_code(code: i64) -> AppResult<Self> {
        match code {
            1 => Ok(AdmitOutcome::Won),
            0 => Ok(AdmitOutcome::SoldOut),
            -1 => Ok(AdmitOutcome::Duplicate),
            -2 => Ok(AdmitOutcome::NotArmed),
            other => Err(AppError::InternalError(format!(
                "秒杀脚本返回了未知结果: {other}"
            ))),
        }
    }
}

pub fn stock_key(sku_id: i64) -> String {
    format!("stock:{sku_id}")
}

pub fn winners_key(sku_id: i64) -> String {
    format!("winners:{sku_id}")
}

/// 秒杀准入门。准入配额与数据库库存是两个量：
/// 这里管理的是活动配额，DB 库存不经过这里。
#[derive(Clone)]
pub struct SeckillGate {
    redis: ConnectionManager,
    script: Arc<Script>,
}

impl SeckillGate {
    pub fn new(redis: ConnectionManager) -> Self {
        Self {
            redis,
            script: Arc::new(Script::new(ADMIT_SCRIPT)),
        }
    }

    /// 为 (sku, user) 原子地保留一个名额
    pub async fn admit(&self, sku_id: i64, user_id: i64) -> AppResult<AdmitOutcome> {
        let mut conn = self.redis.clone();
        let code: i64 = self
            .script
            .key(stock_key(sku_id))
            .key(winners_key(sku_id))
            .arg(user_id)
            .invoke_async(&mut conn)
            .await?;
        AdmitOutcome::from_code(code)
    }

    /// 预热：写入配额并清空中签集合。门不会自行补货。
    pub async fn arm(&self, sku_id: i64, quota: i64) -> AppResult<()> {
        let mut conn = self.redis.clone();
        redis::pipe()
            .atomic()
            .set(stock_key(sku_id), quota)
            .ignore()
            .del(winners_key(sku_id))
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    /// 下线活动：删除配额与中签集合
    pub async fn disarm(&self, sku_id: i64) -> AppResult<()> {
        let mut conn = self.redis.clone();
        redis::pipe()
            .atomic()
            .del(stock_key(sku_id))
            .ignore()
            .del(winners_key(sku_id))
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_decoding() {
        assert_eq!(AdmitOutcome::from_code(1).unwrap(), AdmitOutcome::Won);
        assert_eq!(AdmitOutcome::from_code(0).unwrap(), AdmitOutcome::SoldOut);
        assert_eq!(AdmitOutcome::from_code(-1).unwrap(), AdmitOutcome::Duplicate);
        assert_eq!(AdmitOutcome::from_code(-2).unwrap(), AdmitOutcome::NotArmed);
        assert!(AdmitOutcome::from_code(42).is_err());
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(stock_key(7), "stock:7");
        assert_eq!(winners_key(7), "winners:7");
    }

    #[test]
    fn test_script_mutates_only_after_checks() {
        // 判重与库存检查必须出现在扣减之前
        let dup_check = ADMIT_SCRIPT.find("SISMEMBER").unwrap();
        let stock_check = ADMIT_SCRIPT.find("tonumber").unwrap();
        let decr = ADMIT_SCRIPT.find("DECR").unwrap();
        let sadd = ADMIT_SCRIPT.find("SADD").unwrap();
        assert!(dup_check < decr);
        assert!(stock_check < decr);
        assert!(decr < sadd);
    }
}
