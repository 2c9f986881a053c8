mod config;
mod handlers;
mod server;
#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

use config::ServerConfig;
use devlink_media::{HttpMediaStore, MediaConfig, MediaStore};
use devlink_proto::devlink_service_server::{DevlinkService, DevlinkServiceServer};
use devlink_proto::{
    Empty, GetProfileRequest, LoginRequest, LoginResponse, LogoutRequest, PublicProfile,
    RegisterRequest, RegisterResponse, UpdateProfileRequest, UpdateProfileResponse,
};
use devlink_storage::Store;
use devlink_store_sqlite::SqliteStore;
use server::DevlinkServer;

// ────────────────────────────────────── CLI Types ──────────────────────────────────────

#[derive(Parser)]
#[command(name = "devlink-server")]
#[command(about = "Devlink server CLI for administration and serving")]
struct Cli {
    /// Database URL (sqlite://path/to/db.db)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the gRPC server
    Serve {
        /// Server address
        #[arg(long, default_value = "0.0.0.0:50051")]
        addr: String,

        /// Health check HTTP server address
        #[arg(long, default_value = "0.0.0.0:8080")]
        health_addr: String,
    },
    /// Delete expired sessions and exit
    CleanupSessions,
}

// ────────────────────────────────────── gRPC Server ──────────────────────────────────────

#[tonic::async_trait]
impl DevlinkService for DevlinkServer {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        handlers::auth::register(self, request).await
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        handlers::auth::login(self, request).await
    }

    async fn logout(&self, request: Request<LogoutRequest>) -> Result<Response<Empty>, Status> {
        handlers::auth::logout(self, request).await
    }

    async fn update_profile(
        &self,
        request: Request<UpdateProfileRequest>,
    ) -> Result<Response<UpdateProfileResponse>, Status> {
        handlers::profile::update_profile(self, request).await
    }

    async fn get_profile(
        &self,
        request: Request<GetProfileRequest>,
    ) -> Result<Response<PublicProfile>, Status> {
        handlers::profile::get_profile(self, request).await
    }
}

// ────────────────────────────────────── Entry point ──────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { addr, health_addr } => {
            cmd_serve(cli.database_url, &addr, &health_addr).await
        }
        Command::CleanupSessions => cmd_cleanup_sessions(cli.database_url).await,
    }
}

fn database_url(database_url: Option<String>) -> String {
    database_url.unwrap_or_else(|| "sqlite://devlink.db?mode=rwc".to_string())
}

async fn cmd_cleanup_sessions(
    database_url_arg: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open(&database_url(database_url_arg)).await?;
    let deleted = store.cleanup_expired_sessions().await?;
    println!("Deleted {} expired sessions", deleted);
    Ok(())
}

async fn cmd_serve(
    database_url_arg: Option<String>,
    addr: &str,
    health_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    use axum::{routing::get, Router};

    let addr: std::net::SocketAddr = addr.parse()?;
    let health_addr: std::net::SocketAddr = health_addr.parse()?;

    let store: Arc<dyn Store> = Arc::new(SqliteStore::open(&database_url(database_url_arg)).await?);

    let config = ServerConfig::from_env()?;
    let media: Option<Arc<dyn MediaStore>> = match MediaConfig::from_env()? {
        Some(media_config) => Some(Arc::new(HttpMediaStore::new(media_config))),
        None => {
            tracing::warn!("no media storage configured; profile picture uploads will fail");
            None
        }
    };

    let server = DevlinkServer::new(store, media, config);

    // gRPC health service (implements the gRPC health checking protocol)
    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<DevlinkServiceServer<DevlinkServer>>()
        .await;

    // HTTP health checks for liveness/readiness probes:
    // /healthz - always OK once the process is up
    // /readyz  - OK once the gRPC listener is bound
    let (readiness_tx, readiness_rx) = tokio::sync::watch::channel(false);
    let health_router = Router::new()
        .route("/healthz", get(health_handler))
        .route("/readyz", get(readiness_handler))
        .with_state(ReadinessCheck(readiness_rx));

    let grpc_listener = tokio::net::TcpListener::bind(addr).await?;
    let health_listener = tokio::net::TcpListener::bind(health_addr).await?;

    tracing::info!(
        grpc = %grpc_listener.local_addr()?,
        health = %health_listener.local_addr()?,
        "devlink-server listening"
    );

    // Broadcast channel for shutdown signaling across both servers
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx_clone.send(());
    });

    let _ = readiness_tx.send(true);

    let mut health_shutdown = shutdown_tx.subscribe();
    let health_server =
        axum::serve(health_listener, health_router).with_graceful_shutdown(async move {
            let _ = health_shutdown.recv().await;
        });

    let mut grpc_shutdown = shutdown_tx.subscribe();
    let grpc_server = Server::builder()
        .add_service(health_service)
        .add_service(DevlinkServiceServer::new(server))
        .serve_with_incoming_shutdown(
            tokio_stream::wrappers::TcpListenerStream::new(grpc_listener),
            async move {
                let _ = grpc_shutdown.recv().await;
            },
        );

    let (grpc_result, health_result) = tokio::join!(grpc_server, health_server);
    grpc_result?;
    health_result?;

    Ok(())
}

#[derive(Clone)]
struct ReadinessCheck(tokio::sync::watch::Receiver<bool>);

async fn health_handler() -> &'static str {
    "ok"
}

async fn readiness_handler(
    axum::extract::State(check): axum::extract::State<ReadinessCheck>,
) -> (axum::http::StatusCode, &'static str) {
    if *check.0.borrow() {
        (axum::http::StatusCode::OK, "ready")
    } else {
        (axum::http::StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
