use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Router;
use coordinates_api::core::config::Config;
use coordinates_api::core::openapi::{ApiDoc, SwaggerInfoModifier};
use coordinates_api::core::profile::{Profile, ServerSettings};
use coordinates_api::core::reload::{self, ReloadWatcher};
use coordinates_api::core::{database, middleware};
use coordinates_api::features::coordinates::{routes as coordinates_routes, schema};
use coordinates_api::features::coordinates::CoordinateService;
use coordinates_api::modules::store::{CoordinateStore, MongoCoordinateStore};
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    let profile = Profile::from_args(std::env::args());
    let settings = profile.settings();

    // Profile decides the worker count unless explicitly overridden
    let worker_threads =
        settings.worker_threads(std::env::var("TOKIO_WORKER_THREADS").ok().as_deref());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(profile, settings, worker_threads))
}

async fn async_main(
    profile: Profile,
    settings: ServerSettings,
    worker_threads: usize,
) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(settings.use_colors))
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Starting with profile={}, tokio_worker_threads={}, reload={}, pid={}",
        profile,
        worker_threads,
        settings.reload,
        std::process::id()
    );

    let client = database::create_client(&config.database).await?;
    let db = database::database(&client, &config.database);
    tracing::info!(
        "MongoDB client created for {} (database '{}')",
        config.database.redacted_uri(),
        config.database.name
    );

    if config.database.setup_schema_on_start {
        schema::ensure_schema(&db, &config.database.collection)
            .await
            .map_err(|e| anyhow::anyhow!("Schema setup failed: {}", e))?;
    } else {
        tracing::info!(
            "Skipping schema setup for '{}' (run setup-schema or set SCHEMA_SETUP_ON_START=true)",
            config.database.collection
        );
    }

    let store: Arc<dyn CoordinateStore> = Arc::new(MongoCoordinateStore::new(
        &db,
        &config.database.collection,
    ));
    let coordinate_service = Arc::new(CoordinateService::new(store));
    tracing::info!("Coordinate service initialized");

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };
    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(coordinates_routes::routes(coordinate_service))
        .route("/health", axum::routing::get(health_check))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId::new(settings.clone()))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::cors_layer(
                    config.app.cors_allowed_origins.clone(),
                )),
        );

    let listener = bind_listener(&settings)?;
    tracing::info!("Server listening on http://{}", settings.server_address());
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        settings.server_address()
    );

    let watcher = if settings.reload {
        Some(ReloadWatcher::for_current_exe()?)
    } else {
        None
    };
    let reloading = Arc::new(AtomicBool::new(false));

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(watcher, Arc::clone(&reloading)))
    .await?;

    client.shutdown().await;
    tracing::info!("Server stopped");

    if reloading.load(Ordering::SeqCst) {
        return Err(anyhow::anyhow!("Reload failed: {}", reload::restart()));
    }

    Ok(())
}

fn bind_listener(settings: &ServerSettings) -> anyhow::Result<tokio::net::TcpListener> {
    let addr = settings.server_address();
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}

async fn shutdown_signal(watcher: Option<ReloadWatcher>, reloading: Arc<AtomicBool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let reload = async {
        match watcher {
            Some(watcher) => watcher.changed().await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
        _ = reload => reloading.store(true, Ordering::SeqCst),
    }
}
