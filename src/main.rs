//! Identity server: RBAC users, roles, permissions and session-bound tokens.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use identity_api::{AppState, build_app};
use identity_auth::{
    AccountService, AuthService, PasswordHasher, PasswordValidator, PermissionResolver,
    RevocationCache, RoleService, SessionStore, TokenCodec,
};
use identity_cache::CacheManager;
use identity_core::config::{AppConfig, LoggingConfig};
use identity_core::error::AppError;
use identity_database::repositories::{PgCredentialStore, PgSessionRepository};
use identity_database::{CredentialStore, DatabasePool, SessionRepository};
use identity_entity::user::{AuthProvider, CreatePrincipal};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        tracing::error!(error = %e, "Identity server failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<(), AppError> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::HashPassword { password } => {
            println!("{}", PasswordHasher::new().hash_password(&password)?);
            Ok(())
        }
        Command::Migrate => {
            let config = AppConfig::load(&cli.env)?;
            init_logging(&config.logging);
            let pool = prepare_database(&config).await?;
            pool.close().await;
            Ok(())
        }
        Command::Serve => {
            let config = AppConfig::load(&cli.env)?;
            init_logging(&config.logging);
            run(config).await
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Connect, migrate, and seed roles plus the optional administrator.
async fn prepare_database(config: &AppConfig) -> Result<DatabasePool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    identity_database::migration::run_migrations(pool.pool()).await?;

    let admin = if config.seed.has_admin() {
        Some(CreatePrincipal {
            username: config.seed.username.clone(),
            first_name: config.seed.firstname.clone(),
            last_name: config.seed.lastname.clone(),
            email: config.seed.email.clone(),
            password_hash: PasswordHasher::new().hash_password(&config.seed.password)?,
            provider: AuthProvider::Local.as_str().to_string(),
            created_by: None,
            role_ids: vec![],
        })
    } else {
        None
    };
    identity_database::seed::run_seed(pool.pool(), admin).await?;

    Ok(pool)
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting identity server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection, migrations, seed ───────────
    let pool = prepare_database(&config).await?;

    // ── Step 2: Revocation cache ────────────────────────────────
    let cache = Arc::new(CacheManager::new(&config.cache));

    // ── Step 3: Stores ──────────────────────────────────────────
    let credentials: Arc<dyn CredentialStore> =
        Arc::new(PgCredentialStore::new(pool.pool().clone()));
    let session_repo: Arc<dyn SessionRepository> =
        Arc::new(PgSessionRepository::new(pool.pool().clone()));

    // ── Step 4: Auth components ─────────────────────────────────
    let hasher = Arc::new(PasswordHasher::new());
    let auth = Arc::new(AuthService::new(
        Arc::new(TokenCodec::new(&config.auth)),
        Arc::new(RevocationCache::new(Arc::clone(&cache))),
        Arc::new(SessionStore::new(session_repo, config.auth.refresh_ttl())),
        Arc::new(PermissionResolver::new()),
        Arc::clone(&credentials),
        Arc::clone(&hasher),
        config.auth.access_ttl(),
    ));
    let roles = Arc::new(RoleService::new(Arc::clone(&credentials)));
    let accounts = Arc::new(AccountService::new(
        credentials,
        hasher,
        Arc::new(PasswordValidator::new(&config.auth)),
    ));

    // ── Step 5: HTTP server ─────────────────────────────────────
    let app = build_app(
        AppState::new(auth, accounts, roles, cache),
        &config.server.cors,
    );

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "Identity server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    pool.close().await;
    tracing::info!("Identity server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
