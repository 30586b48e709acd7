use crate::error::AppResult;
use crate::models::{PayRequest, PayResponse};
use crate::services::OrderService;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;

/// 支付服务。与第三方支付网关的交互是模拟的，
/// 支付成功后回调订单服务修改状态。
#[derive(Clone)]
pub struct PaymentService {
    orders: OrderService,
}

impl PaymentService {
    pub fn new(orders: OrderService) -> Self {
        Self { orders }
    }

    pub async fn pay(&self, req: PayRequest) -> AppResult<PayResponse> {
        log::info!(
            "收到支付请求: 订单号 {}, 金额 {:?}",
            req.order_no,
            req.amount
        );

        // 模拟第三方网关的交互延迟
        let delay_ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(500..1500)
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        // 模拟支付成功，生成流水号。实际场景需要验签、核对金额。
        let transaction_id = format!(
            "ALIPAY_{}",
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        log::info!("第三方支付成功，流水号: {transaction_id}");

        // 关键步骤：标记订单已支付；之后的超时消息会因状态检查而成为空操作
        self.orders.mark_paid(&req.order_no).await?;

        log::info!("订单 {} 状态已更新为[已支付]", req.order_no);
        Ok(PayResponse {
            success: true,
            transaction_id,
        })
    }
}
