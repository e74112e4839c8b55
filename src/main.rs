use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use lottery_backend::{
    config::Config,
    handlers,
    middlewares::{DeviceMiddleware, create_cors},
    services::LotteryService,
    storage::open_store,
    swagger::swagger_config,
};

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
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 打开存储
    let store = open_store(&config.storage).expect("Failed to open lottery store");

    // 创建服务
    let lottery_service = LotteryService::new(store, &config.lottery)
        .expect("Invalid lottery configuration");
    let campaign = web::Data::new(config.campaign.clone());
    let debug = web::Data::new(config.debug.clone());

    if debug.clear_enabled {
        log::warn!("Debug clear endpoint is enabled and unauthenticated");
    }

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(DeviceMiddleware)
            .app_data(web::Data::new(lottery_service.clone()))
            .app_data(campaign.clone())
            .app_data(debug.clone())
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::lottery_config)
                    .configure(handlers::campaign_config)
                    .configure(handlers::debug_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
