use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{DefaultHeaders, Logger},
    web, App, HttpServer,
};
use clap::Parser;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use redb::Database;
use shield_backend::{config::Config, helper::session_helpers::SessionIssuer, routes, setup::db_setup};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shield_server", author, version, about = "Starts the Shield Foundation API server.")]
struct Cli {
    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

fn fatal(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("FATAL: {}: {}", context, err))
}

fn build_cors(allowed_origins: &str) -> Cors {
    let cors = if allowed_origins.trim() == "*" {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file).map_err(|e| fatal("Failed to load configuration", e))?;

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let accounts_path = config.accounts_db_path();
    let content_path = config.content_db_path();
    for path in [&accounts_path, &content_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
    }

    let content_db = Database::create(&content_path).map_err(|e| fatal("Failed to open content database", e))?;
    db_setup::setup_content_db(&content_db).map_err(|e| fatal("Failed to prepare content database", e))?;
    let content_db = web::Data::new(content_db);

    let manager = SqliteConnectionManager::file(&accounts_path);
    let pool = Pool::builder()
        .build(manager)
        .map_err(|e| fatal("Failed to create SQLite connection pool", e))?;
    {
        let mut conn = pool.get().map_err(|e| fatal("Failed to open accounts database", e))?;
        db_setup::setup_accounts_db(&mut conn).map_err(|e| fatal("Failed to prepare accounts database", e))?;
    }
    let pool = web::Data::new(pool);

    let issuer = SessionIssuer::from_config(&config).map_err(|e| fatal("Failed to initialise session issuer", e))?;
    let issuer = web::Data::new(issuer);

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    log::info!("Server starting at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.allowed_origins))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            .app_data(content_db.clone())
            .app_data(pool.clone())
            .app_data(issuer.clone())
            .configure(routes::config_api)
    })
    .bind(server_address)?
    .run()
    .await
}
