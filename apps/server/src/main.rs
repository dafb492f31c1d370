use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use bugtrack::auth::{resolve_secret, TokenKeys};
use bugtrack::bootstrap;
use bugtrack::config;
use bugtrack::db;
use bugtrack::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::Config::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("Starting Bugtrack server on {}:{}", config.host, config.port);

    let db_pool = db::create_pool(&config.database).await.map_err(|e| {
        log::error!("Database pool error: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    db::run_migrations(&db_pool).await.map_err(|e| {
        log::error!("Migration error: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    // Demo data only after the database is reachable and migrated
    if config.seed_demo_data {
        bootstrap::run_seed(&db_pool).await;
    }

    tokio::fs::create_dir_all(&config.uploads.dir).await?;
    log::info!("Serving uploads from {}", config.uploads.dir.display());

    let secret = resolve_secret(config.auth.jwt_secret.as_deref());
    let token_keys = TokenKeys::new(&secret, config.auth.token_expiry_hours);

    let host = config.host.clone();
    let port = config.port;

    let server = HttpServer::new(move || {
        // The client may be served from any origin during development
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(token_keys.clone()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(cors)
            .configure(routes::health::configure)
            .configure(routes::auth::configure)
            .configure(routes::bugs::configure)
            .configure(routes::uploads::configure(&config.uploads.dir))
    })
    .bind((host.as_str(), port))?
    .shutdown_timeout(30)
    .run();

    // actix-web stops gracefully on SIGINT/SIGTERM
    server.await?;
    log::info!("Bugtrack server stopped");

    Ok(())
}
