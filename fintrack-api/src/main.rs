use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

mod config;
mod database;
mod handlers;
mod helpers;
mod jobs;

use helpers::query_cache::QueryCache;
use jobs::sync_manager::SyncManager;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "fintrack api"
    }))
}

#[get("/health")]
async fn health(db: web::Data<Arc<database::Database>>) -> impl Responder {
    // Test database connection
    match db.connection.lock() {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("fintrack-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Load config, then open the ledger database at the configured path
    let (config, config_path) = config::ApiConfig::load().expect("Failed to load config");
    tracing::info!("Loaded config from {:?}", config_path);

    let db = helpers::database::initialize_database(&config)
        .expect("Failed to initialize database");

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    // Period query cache and the sync manager that keeps it fresh
    let sync_config = config.sync();
    let cache = Arc::new(QueryCache::new());
    let sync_manager = Arc::new(SyncManager::new(
        db.async_connection.clone(),
        cache.clone(),
        sync_config.cache_ttl_secs,
        sync_config.visibility_window_secs,
    ));

    // Spawn the background poll that refreshes visible dashboard periods
    let manager_clone = sync_manager.clone();
    let poll_interval = std::time::Duration::from_secs(sync_config.poll_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        loop {
            interval.tick().await;
            if manager_clone.is_shutting_down() {
                break;
            }
            match manager_clone.refresh_visible_periods().await {
                Ok(0) => {}
                Ok(count) => tracing::info!("Background sync refreshed {} periods", count),
                Err(e) => tracing::error!("Background sync failed: {}", e),
            }
        }
    });

    println!("Starting server on {}:{}", host, port);

    let sync_manager_for_server = sync_manager.clone();
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(sync_manager_for_server.clone()))
            .service(hello)
            .service(health)
            .route("/api/dashboard", web::get().to(handlers::dashboard::get_dashboard))
            .route("/api/dashboard/refresh", web::post().to(handlers::dashboard::refresh_dashboard))
            .route("/api/transactions", web::get().to(handlers::transactions::list_transactions))
            .route("/api/reports", web::get().to(handlers::reports::get_report))
            .route("/api/categories", web::get().to(handlers::categories::list_categories))
            .route("/api/categories", web::post().to(handlers::categories::create_category))
            .route("/api/categories/{id}", web::put().to(handlers::categories::update_category))
            .route("/api/categories/{id}", web::delete().to(handlers::categories::delete_category))
            .route("/api/providers", web::get().to(handlers::providers::list_providers))
            .route("/api/users/{id}/providers", web::get().to(handlers::providers::list_user_providers))
            .route("/api/users/{id}/providers", web::put().to(handlers::providers::update_user_providers))
            .route("/api/users/{id}/onboarding", web::get().to(handlers::onboarding::get_onboarding))
            .route("/api/users/{id}/onboarding", web::put().to(handlers::onboarding::update_onboarding))
            .route("/api/users/{id}/welcome-seen", web::post().to(handlers::onboarding::mark_welcome_seen))
            .route("/api/demo/dashboard", web::get().to(handlers::demo::demo_dashboard))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    let shutdown_manager = sync_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        shutdown_manager.shutdown();

        handle.stop(true).await;
    });

    server.await
}
