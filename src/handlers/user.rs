use crate::handlers::current_user_id;
use crate::models::*;
use crate::services::UserService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};

#[utoipa::path(
    post,
    path = "/api/v1/user/register",
    tag = "user",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "注册成功"),
        (status = 409, description = "用户名已存在")
    )
)]
pub async fn register(
    user_service: web::Data<UserService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match user_service.register(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(Response::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    tag = "user",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功"),
        (status = 401, description = "密码错误")
    )
)]
pub async fn login(
    user_service: web::Data<UserService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match user_service.login(request.into_inner()).await {
        Ok(auth) => Ok(HttpResponse::Ok().json(Response::success(auth))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/user/refresh",
    tag = "user",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "刷新成功"),
        (status = 401, description = "refresh token 无效")
    )
)]
pub async fn refresh(
    user_service: web::Data<UserService>,
    request: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    match user_service.refresh(&request.refresh_token).await {
        Ok(token) => Ok(HttpResponse::Ok().json(Response::success(token))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/user/info",
    tag = "user",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取用户信息成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn info(user_service: web::Data<UserService>, req: HttpRequest) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match user_service.get_info(user_id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(Response::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/user/update",
    tag = "user",
    request_body = UpdateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新成功")
    )
)]
pub async fn update(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match user_service
        .update_profile(user_id, request.into_inner())
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(Response::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/user/password",
    tag = "user",
    request_body = UpdatePasswordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "修改成功"),
        (status = 401, description = "旧密码错误")
    )
)]
pub async fn password(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    match user_service
        .update_password(user_id, request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(Response::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/info", web::get().to(info))
            .route("/update", web::post().to(update))
            .route("/password", web::post().to(password)),
    );
}
