use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use ouw_tickets::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{FileStore, Mailer, SmtpMailer},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

fn startup_error(stage: &str, e: impl std::fmt::Display) -> std::io::Error {
    log::error!("{stage}: {e}");
    std::io::Error::other(format!("{stage}: {e}"))
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
    let config =
        Config::from_toml().map_err(|e| startup_error("Failed to load configuration", e))?;

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| startup_error("Failed to create database connection pool", e))?;

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run database migrations", e))?;

    // 上传与二维码目录
    let store = FileStore::new(&config.storage);
    store
        .ensure_dirs()
        .await
        .map_err(|e| startup_error("Failed to create storage directories", e))?;

    let mailer: Arc<dyn Mailer> = Arc::new(
        SmtpMailer::new(&config.smtp).map_err(|e| startup_error("Invalid SMTP configuration", e))?,
    );
    if config.smtp.username.is_empty() {
        log::warn!("SMTP username not configured, outgoing emails will likely fail");
    }

    // 创建服务
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.expires_in);
    let auth_service = AuthService::new(pool.clone(), jwt_service);
    auth_service
        .ensure_default_admin(&config.admin)
        .await
        .map_err(|e| startup_error("Failed to seed default admin", e))?;

    let notification_service =
        NotificationService::new(mailer, store.clone(), config.event.clone());
    let order_service = OrderService::new(
        pool.clone(),
        store,
        notification_service,
        config.qr.base_url.clone(),
        config.storage.max_upload_bytes,
    );
    let contact_service = ContactService::new(pool.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(auth_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(contact_service.clone()))
            .configure(swagger_config)
            .configure(handlers::api_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
