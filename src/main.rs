use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use rendezvous::auth::{self, rate_limit::RateLimiter};
use rendezvous::config::{AppConfig, AppEnv};
use rendezvous::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        log::error!("{e}");
        std::process::exit(1);
    });

    let pool = db::init_pool(&config.database_url, config.max_connections)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Seed the admin account (and demo users in staging) if empty
    let seed_hash = auth::password::hash_password("admin123")
        .expect("Failed to hash default password");
    let seeded = match config.app_env {
        AppEnv::Production => db::seed_base(&pool, &seed_hash).await,
        AppEnv::Staging => db::seed_staging(&pool, &seed_hash).await,
    };
    if let Err(e) = seeded {
        log::error!("Seeding failed: {e}");
    }

    let limiter = RateLimiter::default();
    limiter.spawn_cleanup(Duration::from_secs(300));
    let bind_addr = config.bind_addr.clone();
    let secret_key = config.session_key.clone();

    log::info!("Starting {} at http://{}", config.app_name, bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(limiter.clone()))
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            .configure(handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(handlers::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
