use crate::config::RedisConfig;
use crate::error::AppResult;
use redis::aio::ConnectionManager;

/// 共享的 Redis 连接；ConnectionManager 自带重连，跨任务并发安全
pub async fn create_redis(config: &RedisConfig) -> AppResult<ConnectionManager> {
    let client = redis::Client::open(config.connection_url())?;
    let manager = ConnectionManager::new(client).await?;

    // 启动时探活，失败直接让进程退出比半死状态好
    let mut conn = manager.clone();
    redis::cmd("PING").query_async::<()>(&mut conn).await?;

    Ok(manager)
}
