use crate::handlers::current_user_id;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};

#[utoipa::path(
    post,
    path = "/api/v1/order/create",
    tag = "order",
    request_body = CreateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "下单成功"),
        (status = 412, description = "库存不足")
    )
)]
pub async fn create(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match order_service
        .create_order(user_id, request.address_id, &request.sku_ids)
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(Response::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/order/cancel",
    tag = "order",
    request_body = CancelOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "取消成功"),
        (status = 403, description = "不是本人订单"),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn cancel(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CancelOrderRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match order_service
        .cancel(&request.order_no, Some(user_id))
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/order/list",
    tag = "order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取订单列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list(order_service: web::Data<OrderService>, req: HttpRequest) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match order_service.list_orders(user_id).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(Response::success(OrderListResponse { orders }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/order")
            .route("/create", web::post().to(create))
            .route("/cancel", web::post().to(cancel))
            .route("/list", web::get().to(list)),
    );
}
