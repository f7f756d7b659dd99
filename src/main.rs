//! Pulsefeed server binary.
//!
//! Wires configuration, the Postgres store, the mail capability, and the
//! fan-out subsystem together, then serves HTTP until a shutdown signal.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use pulsefeed::adapters::email::WelcomeMailer;
use pulsefeed::adapters::http::{router, AppState};
use pulsefeed::adapters::postgres::PgSubscriberRepository;
use pulsefeed::application::SubscribeHandler;
use pulsefeed::config::AppConfig;
use pulsefeed::fanout::{ingest_channel, producer, Broadcaster, ConnectionRegistry};
use pulsefeed::ports::SubscriberRepository;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("invalid configuration: {}", e);
        std::process::exit(1);
    }

    init_tracing(&config.server.log_level);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}

fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Persistence collaborator.
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;
    let repository: Arc<dyn SubscriberRepository> = Arc::new(PgSubscriberRepository::new(pool));
    repository.create_schema().await?;

    // Mail capability, resolved once.
    let mailer = Arc::new(WelcomeMailer::from_config(&config.email));

    // Fan-out subsystem: queue -> broadcaster -> registry.
    let registry = Arc::new(ConnectionRegistry::new());
    let (ingest, queue) = ingest_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let broadcaster_task = tokio::spawn(
        Broadcaster::new(queue, registry.clone(), shutdown_rx.clone()).run(),
    );
    producer::spawn(&config.producer, ingest, shutdown_rx)?;

    let state = AppState {
        subscribe_handler: Arc::new(SubscribeHandler::new(repository.clone(), mailer)),
        repository,
        registry: registry.clone(),
    };
    let app = router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Orderly teardown: stop the broadcaster after any in-flight fan-out,
    // then drop every live connection. The live producer thread is detached
    // and never joined.
    let _ = shutdown_tx.send(true);
    let _ = broadcaster_task.await;
    registry.close_all().await;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
