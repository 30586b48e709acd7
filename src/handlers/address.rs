use crate::handlers::current_user_id;
use crate::models::*;
use crate::services::AddressService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};

#[utoipa::path(
    post,
    path = "/api/v1/address/create",
    tag = "address",
    request_body = CreateAddressRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建成功")
    )
)]
pub async fn create(
    address_service: web::Data<AddressService>,
    req: HttpRequest,
    request: web::Json<CreateAddressRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match address_service.create(user_id, request.into_inner()).await {
        Ok(address_id) => {
            Ok(HttpResponse::Ok().json(Response::success(CreateAddressResponse { address_id })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/address/list",
    tag = "address",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取地址列表成功")
    )
)]
pub async fn list(
    address_service: web::Data<AddressService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match address_service.list(user_id).await {
        Ok(addrs) => {
            let addresses: Vec<AddressInfo> = addrs.into_iter().map(AddressInfo::from).collect();
            Ok(HttpResponse::Ok().json(Response::success(addresses)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/address/update",
    tag = "address",
    request_body = UpdateAddressRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新成功"),
        (status = 403, description = "不是本人地址")
    )
)]
pub async fn update(
    address_service: web::Data<AddressService>,
    req: HttpRequest,
    request: web::Json<UpdateAddressRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match address_service.update(user_id, request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/address/delete",
    tag = "address",
    request_body = DeleteAddressRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除成功"),
        (status = 403, description = "不是本人地址")
    )
)]
pub async fn delete(
    address_service: web::Data<AddressService>,
    req: HttpRequest,
    request: web::Json<DeleteAddressRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match address_service.delete(user_id, request.address_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/address/set_default",
    tag = "address",
    request_body = SetDefaultAddressRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "设置成功")
    )
)]
pub async fn set_default(
    address_service: web::Data<AddressService>,
    req: HttpRequest,
    request: web::Json<SetDefaultAddressRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match address_service
        .set_default(user_id, request.address_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn address_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/address")
            .route("/create", web::post().to(create))
            .route("/list", web::get().to(list))
            .route("/update", web::post().to(update))
            .route("/delete", web::post().to(delete))
            .route("/set_default", web::post().to(set_default)),
    );
}
