use crate::handlers::current_user_id;
use crate::models::*;
use crate::services::AdminService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};

#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取统计数据成功")
    )
)]
pub async fn dashboard_stats(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service.dashboard_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(Response::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "admin",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("page_size" = Option<u64>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取用户列表成功")
    )
)]
pub async fn list_users(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    query: web::Query<AdminListQuery>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service.list_users(&query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(Response::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/user/toggle",
    tag = "admin",
    request_body = ToggleUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "操作成功")
    )
)]
pub async fn toggle_user(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<ToggleUserRequest>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service
        .toggle_user(request.user_id, request.disabled)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/user/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "用户ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除成功")
    )
)]
pub async fn delete_user(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service.delete_user(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    tag = "admin",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("page_size" = Option<u64>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取商品列表成功")
    )
)]
pub async fn list_skus(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    query: web::Query<AdminListQuery>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service.list_skus(&query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(Response::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/product/update",
    tag = "admin",
    request_body = UpdateSkuRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新成功")
    )
)]
pub async fn update_sku(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<UpdateSkuRequest>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service
        .update_sku(request.sku_id, request.price, request.stock)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/order/ship",
    tag = "admin",
    request_body = ShipOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "发货成功"),
        (status = 412, description = "订单不在可发货状态")
    )
)]
pub async fn ship_order(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<ShipOrderRequest>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service.ship_order(&request.order_no).await {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/seckill/arm",
    tag = "admin",
    request_body = ArmSeckillRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "预热成功")
    )
)]
pub async fn arm_seckill(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<ArmSeckillRequest>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service
        .arm_seckill(request.sku_id, request.quota)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/seckill/disarm",
    tag = "admin",
    request_body = DisarmSeckillRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "下线成功")
    )
)]
pub async fn disarm_seckill(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<DisarmSeckillRequest>,
) -> Result<HttpResponse> {
    let _user_id = current_user_id(&req)?;
    match admin_service.disarm_seckill(request.sku_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/dashboard/stats", web::get().to(dashboard_stats))
            .route("/users", web::get().to(list_users))
            .route("/user/toggle", web::post().to(toggle_user))
            .route("/user/{id}", web::delete().to(delete_user))
            .route("/products", web::get().to(list_skus))
            .route("/product/update", web::post().to(update_sku))
            .route("/order/ship", web::post().to(ship_order))
            .route("/seckill/arm", web::post().to(arm_seckill))
            .route("/seckill/disarm", web::post().to(disarm_seckill)),
    );
}
