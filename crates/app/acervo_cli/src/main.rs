//! Acervo server binary: serve the API, run migrations, bootstrap the
//! first admin account.

use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use acervo_api::{AppState, config::ApiConfig};
use acervo_core::auth::password::hash_password;
use acervo_core::models::user::{NewUser, UserRole};
use acervo_core::storage::Storage;

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Auth(#[from] acervo_core::auth::AuthError),
}

#[derive(Parser)]
#[command(name = "acervo", version, about = "Acervo document publishing backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default when no command is given).
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Staff account administration.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Create an admin account. Later accounts are registered through
    /// the API by an authenticated admin; this bootstraps the first one.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// May also be supplied via ADMIN_PASSWORD.
        #[arg(long, env = "ADMIN_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Migrate => migrate().await,
        Command::Admin {
            command:
                AdminCommand::Create {
                    name,
                    email,
                    password,
                },
        } => create_admin(&name, &email, &password).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "fatal");
        std::process::exit(1);
    }
}

async fn connect(config: &ApiConfig) -> Result<sqlx::PgPool, CliError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

async fn serve() -> Result<(), CliError> {
    let config = ApiConfig::from_env();

    // The upload tree (and its staging area) must exist before the
    // first request hits it.
    tokio::fs::create_dir_all(config.upload_dir.join("temp")).await?;

    let pool = connect(&config).await?;
    acervo_api::migrate(&pool).await?;

    let storage = Storage::new(config.storage_config());
    let bind_addr = config.bind_addr.clone();
    let environment = config.environment.clone();
    let state = AppState {
        pool,
        config,
        storage,
    };
    let app = acervo_api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, env = %environment, "Acervo API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn migrate() -> Result<(), CliError> {
    let config = ApiConfig::from_env();
    let pool = connect(&config).await?;
    acervo_api::migrate(&pool).await?;
    info!("migrations applied");
    Ok(())
}

async fn create_admin(name: &str, email: &str, password: &str) -> Result<(), CliError> {
    let config = ApiConfig::from_env();
    let pool = connect(&config).await?;
    acervo_api::migrate(&pool).await?;

    let user = NewUser {
        email: email.trim().to_lowercase(),
        password_hash: hash_password(password.trim())?,
        name: name.trim().to_string(),
        role: UserRole::Admin,
    };
    let row = acervo_core::auth::queries::create_user(&pool, &user).await?;
    info!(email = %row.email, "admin account created");
    Ok(())
}
