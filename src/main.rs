mod auth;
mod config;
mod connections;
mod db;
mod entity;
mod error;
mod golfer;
mod nonce;
mod reaper;
mod registry;
mod response;
mod routes;
#[cfg(test)]
mod test_support;

use actix_web::{middleware, web, App, HttpServer};
use config::AppConfig;
use db::connect_db;
use log::info;
use registry::Registry;
use response::form_error_handler;
use routes::golfer as golfer_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let config = AppConfig::from_env();
    let db = connect_db(&config).await;
    let registry = Registry::load(&config).unwrap_or_else(|e| panic!("registry load failed: {}", e));
    let registry = web::Data::new(registry);
    reaper::start(db.clone(), config.reaper_interval_secs);
    let server_port = config.server_port;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(db.clone()))
            .app_data(registry.clone())
            .app_data(web::FormConfig::default().error_handler(form_error_handler))
            .wrap(middleware::Logger::default())
            .service(web::scope("/golfer").configure(golfer_routes::config))
    })
    .bind(("0.0.0.0", server_port))?;
    info!("server started at http://0.0.0.0:{}", server_port);
    server.run().await
}
