use crate::handlers::current_user_id;
use crate::models::*;
use crate::services::PaymentService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};

#[utoipa::path(
    post,
    path = "/api/v1/payment/pay",
    tag = "payment",
    request_body = PayRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "支付成功"),
        (status = 412, description = "订单不在可支付状态")
    )
)]
pub async fn pay(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    request: web::Json<PayRequest>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match payment_service.pay(request.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(Response::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/payment").route("/pay", web::post().to(pay)));
}
