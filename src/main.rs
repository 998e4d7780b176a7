use actix_web::{middleware as actix_middleware, App, HttpServer};
use clap::{Parser, Subcommand};
use std::io;
use std::sync::Arc;

mod config;
mod database;
mod errors;
mod logging;
mod middleware;
mod models;
mod routes;
mod services;

use config::{Config, JwtConfig};
use database::MySqlStore;
use middleware::rate_limiter::UserRateLimiter;
use services::auth_service::AuthService;
use services::subscription_service::SubscriptionService;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables and exit
    InitDb,
    /// Print a signed token for local testing
    /// cargo run -- issue-token --user-id 1
    IssueToken {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        username: Option<String>,
        /// Validity in days
        #[arg(long, default_value_t = 30)]
        days: i64,
    },
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    logging::setup_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::InitDb) => init_db(&load_config()?).await,
        Some(Commands::IssueToken {
            user_id,
            username,
            days,
        }) => {
            let jwt = JwtConfig::from_env().map_err(|e| to_io_error("JWT_SECRET is not set", e))?;
            issue_token(&jwt, user_id, username, days)
        }
        None => start_server(load_config()?).await,
    }
}

fn load_config() -> io::Result<Config> {
    Config::from_env().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::Other, "Configuration loading failed")
    })
}

fn to_io_error(context: &str, e: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, e);
    io::Error::new(io::ErrorKind::Other, context.to_string())
}

async fn init_db(config: &Config) -> io::Result<()> {
    let db_pool = database::create_pool(&config.database_url)
        .map_err(|e| to_io_error("Invalid database URL", e))?;
    database::init_schema(&db_pool)
        .await
        .map_err(|e| to_io_error("Schema initialization failed", e))?;
    db_pool
        .disconnect()
        .await
        .map_err(|e| to_io_error("Failed to close database pool", e))
}

fn issue_token(jwt: &JwtConfig, user_id: i64, username: Option<String>, days: i64) -> io::Result<()> {
    let token = AuthService::from_config(jwt)
        .issue_token(user_id, username, chrono::Duration::days(days))
        .map_err(|e| to_io_error("Token signing failed", e))?;
    println!("{} {}", jwt.header_prefix, token);
    Ok(())
}

async fn start_server(config: Config) -> io::Result<()> {
    let db_pool = database::create_pool(&config.database_url)
        .map_err(|e| to_io_error("Invalid database URL", e))?;
    database::init_schema(&db_pool)
        .await
        .map_err(|e| to_io_error("Schema initialization failed", e))?;

    let store = Arc::new(MySqlStore::new(db_pool.clone()));
    let app_state = routes::AppState {
        subscription_service: Arc::new(SubscriptionService::new(store)),
        auth_service: Arc::new(AuthService::from_config(&config.jwt)),
    };

    let rate_limiter = UserRateLimiter::new();

    let bind_address = config.bind_address.clone();
    log::info!(
        "Starting server at {} with {} workers",
        bind_address,
        config.workers
    );

    HttpServer::new(move || {
        App::new()
            .app_data(actix_web::web::Data::new(app_state.clone()))
            .wrap(rate_limiter.clone())
            .wrap(actix_middleware::Logger::default())
            .configure(routes::init_routes)
    })
    .workers(config.workers)
    .bind(&bind_address)
    .map_err(|e| {
        log::error!("Failed to bind server to {}: {}", bind_address, e);
        e
    })?
    .run()
    .await?;

    log::info!("Server stopped, closing database pool");
    db_pool
        .disconnect()
        .await
        .map_err(|e| to_io_error("Failed to close database pool", e))
}
