use crate::error::AppResult;
use crate::mq::{SeckillMessage, ORDER_CLOSE_QUEUE, SECKILL_QUEUE};
use crate::services::OrderService;
use futures_util::StreamExt;
use lapin::options::{BasicAckOptions, BasicConsumeOptions};
use lapin::types::FieldTable;
use lapin::Connection;
use std::time::Duration;

/// 消息本身不携带调用方上下文，消费侧统一使用 5 秒预算
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// 启动两个后台消费者：超时关单、秒杀落库。
/// 两个消费者各用独立 channel，手动确认。
pub async fn spawn_consumers(conn: &Connection, orders: OrderService) -> AppResult<()> {
    spawn_close_consumer(conn, orders.clone()).await?;
    spawn_seckill_consumer(conn, orders).await?;
    Ok(())
}

/// 消费者 1: 监听超时订单。取消操作自身带状态前置检查，
/// 重复投递是无害的，所以任何结果都确认消息，避免死循环。
async fn spawn_close_consumer(conn: &Connection, orders: OrderService) -> AppResult<()> {
    let channel = conn.create_channel().await?;
    let mut consumer = channel
        .basic_consume(
            ORDER_CLOSE_QUEUE,
            "order-close-consumer",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    tokio::spawn(async move {
        while let Some(delivery) = consumer.next().await {
            let delivery = match delivery {
                Ok(d) => d,
                Err(e) => {
                    log::error!("[MQ] 关单队列消费出错: {e}");
                    continue;
                }
            };

            let order_no = String::from_utf8_lossy(&delivery.data).to_string();
            log::info!("[MQ] 收到超时订单需处理: {order_no}");

            match tokio::time::timeout(MESSAGE_TIMEOUT, orders.cancel(&order_no, None)).await {
                Ok(Ok(())) => log::info!("[MQ] 订单 {order_no} 已自动取消"),
                Ok(Err(e)) => log::error!("[MQ] 自动取消失败: {e}"),
                Err(_) => log::error!("[MQ] 自动取消超时: {order_no}"),
            }

            if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                log::error!("[MQ] 确认关单消息失败: {e}");
            }
        }
        log::warn!("[MQ] 关单消费者退出");
    });

    Ok(())
}

/// 消费者 2: 监听秒杀成功消息，异步创建订单。
/// 落库以 order_no 唯一索引兜底幂等；失败也确认，
/// 防止毒消息堵塞队列（失败侧的死信告警是已知的待办）。
async fn spawn_seckill_consumer(conn: &Connection, orders: OrderService) -> AppResult<()> {
    let channel = conn.create_channel().await?;
    let mut consumer = channel
        .basic_consume(
            SECKILL_QUEUE,
            "seckill-order-consumer",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    tokio::spawn(async move {
        while let Some(delivery) = consumer.next().await {
            let delivery = match delivery {
                Ok(d) => d,
                Err(e) => {
                    log::error!("[MQ] 秒杀队列消费出错: {e}");
                    continue;
                }
            };

            match serde_json::from_slice::<SeckillMessage>(&delivery.data) {
                Ok(msg) => {
                    log::info!(
                        "[MQ] 开始处理秒杀订单: User={} SKU={}",
                        msg.user_id,
                        msg.sku_id
                    );
                    match tokio::time::timeout(
                        MESSAGE_TIMEOUT,
                        orders.create_seckill_order(msg.user_id, msg.sku_id),
                    )
                    .await
                    {
                        Ok(Ok(())) => log::info!(
                            "[MQ] 秒杀下单成功: User={} SKU={}",
                            msg.user_id,
                            msg.sku_id
                        ),
                        Ok(Err(e)) => log::error!("[MQ] 秒杀下单失败: {e}"),
                        Err(_) => log::error!(
                            "[MQ] 秒杀下单超时: User={} SKU={}",
                            msg.user_id,
                            msg.sku_id
                        ),
                    }
                }
                Err(e) => {
                    // 格式错误，丢弃
                    log::error!("[MQ] 秒杀消息解析失败: {e}");
                }
            }

            if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                log::error!("[MQ] 确认秒杀消息失败: {e}");
            }
        }
        log::warn!("[MQ] 秒杀消费者退出");
    });

    Ok(())
}
