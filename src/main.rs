use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Local;
use env_logger::{Env, Target};
use lapin::Connection;
use std::io::Write; // for env_logger custom formatter

use flashmall::{
    config::Config,
    database::{create_pool, create_redis, run_migrations},
    error::AppResult,
    handlers,
    middlewares::{create_cors, AuthMiddleware},
    mq,
    mq::{DelayPublisher, SeckillPublisher},
    services::*,
    swagger::swagger_config,
    utils::{FlowRule, JwtService, RateLimiter, RES_SECKILL},
};

async fn setup_mq(
    conn: &Connection,
    ttl_ms: u32,
) -> AppResult<(DelayPublisher, SeckillPublisher)> {
    let channel = conn.create_channel().await?;
    mq::declare_topology(&channel, ttl_ms).await?;

    // 生产方各自持有独立 channel，与消费者互不共用
    let delay = DelayPublisher::new(conn.create_channel().await?);
    let seckill = SeckillPublisher::new(conn.create_channel().await?);
    Ok((delay, seckill))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration");

    // 初始化 MySQL 连接池并执行迁移
    let pool = create_pool(&config.mysql)
        .await
        .expect("Failed to create database connection pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 初始化 Redis（秒杀准入门与购物车都依赖它）
    let redis = create_redis(&config.redis)
        .await
        .expect("Failed to connect to Redis");

    // 初始化 RabbitMQ（重试机制）。失败时以降级模式启动：
    // 自动取消和秒杀下单功能将失效。
    let mq_conn = mq::connect_with_retry(&config.rabbitmq.url).await;
    let mut delay_publisher = None;
    let mut seckill_publisher = None;
    let mut mq_ready = false;
    if let Some(conn) = &mq_conn {
        match setup_mq(conn, config.seckill.ttl_ms).await {
            Ok((delay, seckill)) => {
                delay_publisher = Some(delay);
                seckill_publisher = Some(seckill);
                mq_ready = true;
            }
            Err(e) => log::error!("[警告] RabbitMQ 拓扑初始化失败: {e}"),
        }
    }
    if !mq_ready {
        log::warn!("[警告] RabbitMQ 未连接，自动取消和秒杀下单功能将失效！");
    }

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 创建各业务服务
    let gate = SeckillGate::new(redis.clone());
    let inventory_service = InventoryService::new(pool.clone());
    let cart_service = CartService::new(redis.clone());
    let address_service = AddressService::new(pool.clone());
    let product_service = ProductService::new(pool.clone(), gate.clone(), seckill_publisher);
    let order_service = OrderService::new(
        pool.clone(),
        inventory_service,
        cart_service.clone(),
        address_service.clone(),
        product_service.clone(),
        delay_publisher,
    );
    let payment_service = PaymentService::new(order_service.clone());
    let review_service =
        ReviewService::new(pool.clone(), order_service.clone(), product_service.clone());
    let admin_service = AdminService::new(pool.clone(), order_service.clone(), gate.clone());
    let user_service = UserService::new(pool.clone(), jwt_service.clone());

    // 启动后台消费者：超时关单 + 秒杀落库
    if mq_ready {
        if let Some(conn) = &mq_conn {
            if let Err(e) = mq::spawn_consumers(conn, order_service.clone()).await {
                log::error!("启动消息消费者失败: {e}");
            }
        }
    }

    // 秒杀入口限流
    let rate_limiter = web::Data::new(RateLimiter::new());
    rate_limiter.load_rule(RES_SECKILL, FlowRule::per_second(config.seckill.qps));
    log::info!("秒杀限流规则已加载 (QPS Limit: {})", config.seckill.qps);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(rate_limiter.clone())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(product_service.clone()))
            .app_data(web::Data::new(cart_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(address_service.clone()))
            .app_data(web::Data::new(review_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::user_config)
                    .configure(handlers::product_config)
                    .configure(handlers::cart_config)
                    .configure(handlers::order_config)
                    .configure(handlers::payment_config)
                    .configure(handlers::address_config)
                    .configure(handlers::review_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
