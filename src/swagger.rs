use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::user::register,
        handlers::user::login,
        handlers::user::refresh,
        handlers::user::info,
        handlers::user::update,
        handlers::user::password,
        handlers::product::list,
        handlers::product::detail,
        handlers::product::seckill,
        handlers::cart::add,
        handlers::cart::delete,
        handlers::cart::list,
        handlers::order::create,
        handlers::order::cancel,
        handlers::order::list,
        handlers::payment::pay,
        handlers::address::create,
        handlers::address::list,
        handlers::address::update,
        handlers::address::delete,
        handlers::address::set_default,
        handlers::review::add,
        handlers::review::list,
        handlers::review::status,
        handlers::admin::dashboard_stats,
        handlers::admin::list_users,
        handlers::admin::toggle_user,
        handlers::admin::delete_user,
        handlers::admin::list_skus,
        handlers::admin::update_sku,
        handlers::admin::ship_order,
        handlers::admin::arm_seckill,
        handlers::admin::disarm_seckill,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            UserResponse,
            AuthResponse,
            AccessTokenResponse,
            UpdateUserRequest,
            UpdatePasswordRequest,
            ProductInfo,
            ProductListResponse,
            ProductDetail,
            SeckillRequest,
            SeckillResponse,
            CartItem,
            CartAddRequest,
            CartDeleteRequest,
            CartListResponse,
            CreateOrderRequest,
            CreateOrderResponse,
            CancelOrderRequest,
            OrderItemInfo,
            OrderInfo,
            OrderListResponse,
            PayRequest,
            PayResponse,
            CreateAddressRequest,
            UpdateAddressRequest,
            DeleteAddressRequest,
            SetDefaultAddressRequest,
            AddressInfo,
            CreateAddressResponse,
            AddReviewRequest,
            ReviewInfo,
            ReviewListResponse,
            ReviewStatusResponse,
            AddReviewResponse,
            CategoryStat,
            TrendStat,
            StatsResponse,
            AdminUserInfo,
            AdminUserListResponse,
            ToggleUserRequest,
            AdminSkuInfo,
            AdminSkuListResponse,
            UpdateSkuRequest,
            ShipOrderRequest,
            ArmSeckillRequest,
            DisarmSeckillRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "user", description = "用户相关接口"),
        (name = "product", description = "商品与秒杀接口"),
        (name = "cart", description = "购物车接口"),
        (name = "order", description = "订单接口"),
        (name = "payment", description = "支付接口"),
        (name = "address", description = "收货地址接口"),
        (name = "review", description = "商品评价接口"),
        (name = "admin", description = "管理端接口")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
