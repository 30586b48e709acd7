use crate::handlers::current_user_id;
use crate::models::*;
use crate::services::CartService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};

#[utoipa::path(
    post,
    path = "/api/v1/cart/add",
    tag = "cart",
    request_body = CartAddRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "添加成功")
    )
)]
pub async fn add(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
    request: web::Json<CartAddRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match cart_service
        .add_item(user_id, request.sku_id, request.quantity)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/cart/delete",
    tag = "cart",
    request_body = CartDeleteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除成功")
    )
)]
pub async fn delete(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
    request: web::Json<CartDeleteRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match cart_service.delete_item(user_id, request.sku_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cart/list",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取购物车成功")
    )
)]
pub async fn list(cart_service: web::Data<CartService>, req: HttpRequest) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match cart_service.list(user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(Response::success(CartListResponse { items }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .route("/add", web::post().to(add))
            .route("/delete", web::post().to(delete))
            .route("/list", web::get().to(list)),
    );
}
