use crate::handlers::current_user_id;
use crate::models::*;
use crate::services::ProductService;
use crate::utils::{RateLimiter, RES_SECKILL};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};

#[utoipa::path(
    get,
    path = "/api/v1/product/list",
    tag = "product",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("page_size" = Option<u64>, Query, description = "每页数量"),
        ("category_id" = Option<i64>, Query, description = "分类ID"),
        ("query" = Option<String>, Query, description = "搜索关键词")
    ),
    responses(
        (status = 200, description = "获取商品列表成功")
    )
)]
pub async fn list(
    product_service: web::Data<ProductService>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    match product_service.list_products(&query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(Response::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/product/detail",
    tag = "product",
    params(
        ("id" = i64, Query, description = "SKU ID")
    ),
    responses(
        (status = 200, description = "获取商品详情成功"),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn detail(
    product_service: web::Data<ProductService>,
    query: web::Query<ProductDetailQuery>,
) -> Result<HttpResponse> {
    match product_service.get_product(query.id).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(Response::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/product/seckill",
    tag = "product",
    request_body = SeckillRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "抢购成功"),
        (status = 409, description = "重复抢购"),
        (status = 412, description = "活动未预热"),
        (status = 429, description = "已售罄或系统繁忙")
    )
)]
pub async fn seckill(
    product_service: web::Data<ProductService>,
    limiter: web::Data<RateLimiter>,
    req: HttpRequest,
    request: web::Json<SeckillRequest>,
) -> Result<HttpResponse> {
    // 限流埋点：被拒绝的请求不会触达准入门
    let entry = match limiter.entry(RES_SECKILL) {
        Ok(entry) => entry,
        Err(e) => return Ok(e.error_response()),
    };

    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => {
            entry.exit();
            return Ok(e.error_response());
        }
    };

    let result = product_service.seckill(user_id, request.sku_id).await;
    entry.exit();

    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::success(SeckillResponse { success: true }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/product")
            .route("/list", web::get().to(list))
            .route("/detail", web::get().to(detail))
            .route("/seckill", web::post().to(seckill)),
    );
}
