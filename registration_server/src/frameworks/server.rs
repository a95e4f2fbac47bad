// Framework bootstrap for the registration server runtime.

use crate::domain::ports::BookingStore;
use crate::frameworks::config::{self, Settings};
use crate::frameworks::db::{connect_pool, run_migrations};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{AppState, Policy, SystemClock};
use crate::interface_adapters::stores::{
    FilesystemDocumentStore, InMemoryBookingStore, PostgresBookingStore,
};
use crate::interface_adapters::utils::rng::SecureTokenSource;

use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, settings: Settings) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(settings).await?;
    let app = app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = Settings::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
    })?;
    let address = SocketAddr::new(config::bind_addr(), config::http_port());

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, settings).await
}

async fn build_state(settings: Settings) -> Result<AppState> {
    if settings.token_length == 0 || settings.token_max_retries == 0 {
        return Err(std::io::Error::other(
            "TOKEN_LENGTH and TOKEN_MAX_RETRIES must both be positive",
        ));
    }

    let bookings: Arc<dyn BookingStore> = match settings.database_url.as_deref() {
        Some(database_url) => {
            let db = connect_pool(database_url)
                .await
                .map_err(|e| std::io::Error::other(format!("failed to connect to database: {e}")))?;
            run_migrations(&db)
                .await
                .map_err(|e| std::io::Error::other(format!("failed to run migrations: {e}")))?;
            tracing::info!("using postgres booking store");
            Arc::new(PostgresBookingStore { db })
        }
        None => {
            // Handy for local runs; nothing survives a restart.
            tracing::warn!("DATABASE_URL not set, using in-memory booking store");
            Arc::new(InMemoryBookingStore::new())
        }
    };

    tokio::fs::create_dir_all(&settings.upload_dir)
        .await
        .inspect_err(|e| {
            tracing::error!(
                upload_dir = %settings.upload_dir.display(),
                error = %e,
                "failed to prepare upload directory"
            );
        })?;
    tracing::debug!(
        upload_dir = %settings.upload_dir.display(),
        public_base_url = %settings.public_base_url,
        token_length = settings.token_length,
        token_max_retries = settings.token_max_retries,
        "registration server configured"
    );

    let documents = FilesystemDocumentStore::new(settings.upload_dir, settings.public_base_url);
    let documents_base_url = Arc::from(documents.uploads_url().as_str());

    Ok(AppState {
        bookings,
        documents: Arc::new(documents),
        tokens: Arc::new(SecureTokenSource),
        clock: Arc::new(SystemClock),
        policy: Policy {
            admin_token: Arc::from(settings.admin_token.as_str()),
            token_length: settings.token_length,
            token_max_retries: settings.token_max_retries,
            max_upload_bytes: settings.max_upload_bytes,
            documents_base_url,
        },
    })
}
