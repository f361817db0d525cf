mod config;
mod db;
mod error;
mod guides;
mod notify;
mod pagination;
mod services;

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

use crate::config::Config;
use crate::db::Db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();
    let db = Db::new(&config.database_path);

    {
        let conn = db.open().map_err(std::io::Error::other)?;
        db::init_schema(&conn).map_err(std::io::Error::other)?;
    }
    std::fs::create_dir_all(&config.media_root)?;

    let bind_addr = (config.host.clone(), config.port);
    info!("server running at http://{}:{}", config.host, config.port);

    let media_root = config.media_root.clone();
    let app_db = web::Data::new(db);
    let app_config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(1024 * 1024)) // 1 MB
            .app_data(app_db.clone())
            .app_data(app_config.clone())
            .service(services::guides::configure_routes())
            .service(services::service_requests::configure_routes())
            .service(services::reviews::configure_routes())
            .service(services::search::configure_routes())
            .service(Files::new("/media", media_root.clone()))
    })
    .bind(bind_addr)?
    .run()
    .await
}
