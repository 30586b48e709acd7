use crate::handlers::current_user_id;
use crate::models::*;
use crate::services::ReviewService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};

#[utoipa::path(
    post,
    path = "/api/v1/review/add",
    tag = "review",
    request_body = AddReviewRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "评价成功"),
        (status = 409, description = "已评价过")
    )
)]
pub async fn add(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    request: web::Json<AddReviewRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match review_service.add_review(user_id, request.into_inner()).await {
        Ok(review_id) => {
            Ok(HttpResponse::Ok().json(Response::success(AddReviewResponse { review_id })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/review/list",
    tag = "review",
    params(
        ("product_id" = i64, Query, description = "商品ID"),
        ("page" = Option<u64>, Query, description = "页码"),
        ("page_size" = Option<u64>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "获取评价列表成功")
    )
)]
pub async fn list(
    review_service: web::Data<ReviewService>,
    query: web::Query<ReviewListQuery>,
) -> Result<HttpResponse> {
    match review_service.list_reviews(&query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(Response::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/review/status",
    tag = "review",
    params(
        ("order_no" = String, Query, description = "订单号"),
        ("sku_id" = i64, Query, description = "SKU ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "查询成功")
    )
)]
pub async fn status(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    query: web::Query<ReviewStatusQuery>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match review_service
        .has_reviewed(user_id, &query.order_no, query.sku_id)
        .await
    {
        Ok(has_reviewed) => {
            Ok(HttpResponse::Ok().json(Response::success(ReviewStatusResponse { has_reviewed })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn review_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/review")
            .route("/add", web::post().to(add))
            .route("/list", web::get().to(list))
            .route("/status", web::get().to(status)),
    );
}
