use crate::error::AppResult;
use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Channel};
use serde::{Deserialize, Serialize};

/// 秒杀消息，准入成功后投递，由订单消费者异步落库
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeckillMessage {
    pub user_id: i64,
    pub sku_id: i64,
}

/// 发送延迟消息（订单超时控制）。消息体就是 order_no，
/// 持久化投递，broker 重启后仍然生效。
#[derive(Clone)]
pub struct DelayPublisher {
    channel: Channel,
}

impl DelayPublisher {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    pub async fn publish(&self, order_no: &str) -> AppResult<()> {
        self.channel
            .basic_publish(
                "",
                super::ORDER_DELAY_QUEUE,
                BasicPublishOptions::default(),
                order_no.as_bytes(),
                BasicProperties::default()
                    .with_content_type("text/plain".into())
                    .with_delivery_mode(2), // persistent
            )
            .await?
            .await?;
        Ok(())
    }
}

/// 秒杀事件发布方，与消费者使用各自独立的 channel
#[derive(Clone)]
pub struct SeckillPublisher {
    channel: Channel,
}

impl SeckillPublisher {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    pub async fn publish(&self, message: &SeckillMessage) -> AppResult<()> {
        let body = serde_json::to_vec(message)?;
        self.channel
            .basic_publish(
                "",
                super::SECKILL_QUEUE,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_delivery_mode(2),
            )
            .await?
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seckill_message_wire_format() {
        let msg = SeckillMessage {
            user_id: 42,
            sku_id: 9,
        };
        let body = serde_json::to_string(&msg).unwrap();
        assert_eq!(body, r#"{"user_id":42,"sku_id":9}"#);

        let parsed: SeckillMessage = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, msg);
    }
}
