pub mod consumers;
pub mod publisher;

pub use consumers::spawn_consumers;
pub use publisher::{DelayPublisher, SeckillMessage, SeckillPublisher};

use crate::error::AppResult;
use lapin::options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions};
use lapin::types::{AMQPValue, FieldTable};
use lapin::{Channel, Connection, ConnectionProperties, ExchangeKind};
use std::time::Duration;

// 死信队列配置 (用于订单超时取消)
pub const ORDER_DELAY_QUEUE: &str = "order.delay.queue"; // 延迟缓冲队列
pub const ORDER_DLX: &str = "order.dlx"; // 死信交换机
pub const ORDER_CLOSE_QUEUE: &str = "order.close.queue"; // 实际消费队列
pub const ORDER_CLOSE_ROUTING: &str = "order.close"; // 路由Key

// 秒杀队列配置 (用于削峰填谷)
pub const SECKILL_QUEUE: &str = "seckill.order.queue";

/// 连接 RabbitMQ，最多重试 10 次、间隔 2 秒。
/// 全部失败时返回 None，调用方以降级模式启动。
pub async fn connect_with_retry(url: &str) -> Option<Connection> {
    for attempt in 1..=10 {
        match Connection::connect(url, ConnectionProperties::default()).await {
            Ok(conn) => {
                log::info!("RabbitMQ connected (attempt {attempt})");
                return Some(conn);
            }
            Err(e) => {
                log::warn!("等待 RabbitMQ... ({attempt}/10): {e}");
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
    None
}

/// 声明全部队列与交换机。幂等，可在每次启动时执行。
pub async fn declare_topology(channel: &Channel, ttl_ms: u32) -> AppResult<()> {
    let durable = QueueDeclareOptions {
        durable: true,
        ..QueueDeclareOptions::default()
    };

    // A. 死信交换机 (DLX)
    channel
        .exchange_declare(
            ORDER_DLX,
            ExchangeKind::Direct,
            ExchangeDeclareOptions {
                durable: true,
                ..ExchangeDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await?;

    // B. 实际消费队列，绑定到 DLX
    channel
        .queue_declare(ORDER_CLOSE_QUEUE, durable, FieldTable::default())
        .await?;
    channel
        .queue_bind(
            ORDER_CLOSE_QUEUE,
            ORDER_DLX,
            ORDER_CLOSE_ROUTING,
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;

    // C. 延迟队列：无消费者，消息到达 TTL 后经 DLX 路由到消费队列
    let mut delay_args = FieldTable::default();
    delay_args.insert(
        "x-dead-letter-exchange".into(),
        AMQPValue::LongString(ORDER_DLX.into()),
    );
    delay_args.insert(
        "x-dead-letter-routing-key".into(),
        AMQPValue::LongString(ORDER_CLOSE_ROUTING.into()),
    );
    delay_args.insert("x-message-ttl".into(), AMQPValue::LongUInt(ttl_ms));
    channel
        .queue_declare(ORDER_DELAY_QUEUE, durable, delay_args)
        .await?;

    // D. 秒杀下单队列
    channel
        .queue_declare(SECKILL_QUEUE, durable, FieldTable::default())
        .await?;

    log::info!("RabbitMQ 拓扑初始化成功 (TTL={ttl_ms}ms)");
    Ok(())
}
