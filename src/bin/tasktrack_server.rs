//! Runs the tasktrack HTTP server.
//!
//! Usage:
//!
//! ```text
//! tasktrack-server [--config <path>] [--port <port>] [--in-memory] [--print-config]
//! ```
//!
//! Configuration is layered as described in [`tasktrack::config`]. With
//! `--in-memory` the server keeps records in process memory instead of
//! `PostgreSQL`; the mirror log still applies.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mockable::{Clock, DefaultClock};
use tasktrack::api::{LocalTracker, SharedTracker, router};
use tasktrack::bootstrap::{BootstrapError, seed_from_mirror};
use tasktrack::config::{AppConfig, ConfigError};
use tasktrack::consistency::adapters::PostgresCascadeStore;
use tasktrack::consistency::ports::CascadeStore;
use tasktrack::consistency::services::UserDeletionService;
use tasktrack::mirror::MirrorLog;
use tasktrack::mirror::MirrorPublisher;
use tasktrack::mirror::adapters::{DisabledMirrorLog, JsonlMirrorLog};
use tasktrack::store::{InMemoryStore, PostgresStore, StoreSetupError};
use tasktrack::task::adapters::postgres::PostgresTaskRepository;
use tasktrack::task::ports::TaskRepository;
use tasktrack::task::services::TaskLifecycleService;
use tasktrack::telemetry;
use tasktrack::user::adapters::postgres::PostgresUserRepository;
use tasktrack::user::ports::UserRepository;
use tasktrack::user::services::UserDirectoryService;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "tasktrack-server", version, about = "Time-tracking HTTP server")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, env = "TASKTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the configured listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Keeps records in memory instead of `PostgreSQL`.
    #[arg(long)]
    in_memory: bool,

    /// Prints the effective configuration and exits.
    #[arg(long)]
    print_config: bool,
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreSetupError),
    #[error("mirror replay failed: {0}")]
    Bootstrap(#[from] BootstrapError),
    #[error("failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    run(cli).await.map_err(Into::into)
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.print_config {
        writeln!(std::io::stdout().lock(), "{}", config.to_pretty_json()?)?;
        return Ok(());
    }
    telemetry::init(&config.logging);

    let clock: Arc<DefaultClock> = Arc::new(DefaultClock);
    let log = mirror_log(&config);
    let mirror = MirrorPublisher::new(Arc::clone(&log), Arc::clone(&clock) as Arc<dyn Clock>);

    let tracker = if cli.in_memory {
        info!("using in-memory record store");
        let store = Arc::new(InMemoryStore::new());
        if config.mirror.replay_on_empty {
            seed_from_mirror(&*store, &*store, log.as_ref()).await?;
        }
        build_tracker(
            Arc::clone(&store),
            Arc::clone(&store),
            store,
            mirror,
            clock,
        )
    } else {
        let store = PostgresStore::connect(
            &config.database.url,
            config.database.max_connections,
            config.database.connect_timeout(),
        )?;
        store.ensure_schema().await?;
        let users = Arc::new(PostgresUserRepository::new(store.clone()));
        let tasks = Arc::new(PostgresTaskRepository::new(store.clone()));
        if config.mirror.replay_on_empty
            && seed_from_mirror(&*users, &*tasks, log.as_ref())
                .await?
                .is_some()
        {
            store.sync_sequences().await?;
        }
        let cascade = Arc::new(PostgresCascadeStore::new(store));
        build_tracker(users, tasks, cascade, mirror, clock)
    };

    let addr = config.server.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router(tracker))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

fn mirror_log(config: &AppConfig) -> Arc<dyn MirrorLog> {
    if config.mirror.enabled {
        info!(dir = %config.mirror.dir.display(), "mirror log enabled");
        Arc::new(JsonlMirrorLog::new(config.mirror.dir.clone()))
    } else {
        info!("mirror log disabled");
        Arc::new(DisabledMirrorLog)
    }
}

fn build_tracker<U, T, D>(
    users: Arc<U>,
    tasks: Arc<T>,
    cascade: Arc<D>,
    mirror: MirrorPublisher,
    clock: Arc<DefaultClock>,
) -> SharedTracker
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    D: CascadeStore + 'static,
{
    Arc::new(LocalTracker::new(
        UserDirectoryService::new(users, mirror.clone(), Arc::clone(&clock)),
        TaskLifecycleService::new(tasks, mirror.clone(), clock),
        UserDeletionService::new(cascade, mirror),
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
