mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::geocoding::NominatimGeocodingService;
use crate::features::locations::{
    routes as locations_routes, FormSessionService, FuzzyMatcher, HierarchyResolver,
    LocationService, RegionSearchService, SynonymTable, SyncStatusEvaluator,
};
use crate::features::regions::{CachedRegionDirectory, RegionApiClient, RegionDirectory};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Administrative directory (backend regions API behind a TTL cache)
    let region_api_client: Arc<dyn RegionDirectory> = Arc::new(
        RegionApiClient::new(&config.regions_api)
            .map_err(|e| anyhow::anyhow!("Failed to initialize regions API client: {}", e))?,
    );
    let directory: Arc<dyn RegionDirectory> = if config.regions_api.cache_ttl.is_zero() {
        tracing::info!("Regions API cache disabled");
        region_api_client
    } else {
        Arc::new(CachedRegionDirectory::new(
            region_api_client,
            config.regions_api.cache_ttl,
        ))
    };
    tracing::info!("Regions API client initialized ({})", config.regions_api.base_url);

    // Geocoder
    let geocoder = Arc::new(
        NominatimGeocodingService::new(&config.nominatim)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Nominatim client: {}", e))?,
    );
    tracing::info!("Nominatim geocoder initialized ({})", config.nominatim.base_url);

    // Matching pipeline
    let synonyms = SynonymTable::from_path_or_embedded(config.matching.synonyms_path.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load region synonyms: {}", e))?;
    tracing::info!("Region synonym table loaded ({} names)", synonyms.len());

    let matcher = FuzzyMatcher::new(Arc::new(synonyms));
    let resolver = Arc::new(HierarchyResolver::new(
        Arc::clone(&directory),
        matcher.clone(),
    ));
    let evaluator = SyncStatusEvaluator::from_config(&config.matching);
    let location_service = Arc::new(LocationService::new(geocoder, resolver, evaluator));
    let search_service = Arc::new(RegionSearchService::new(directory, matcher));
    let session_service = Arc::new(FormSessionService::new(
        Arc::clone(&location_service),
        config.app.form_session_ttl,
    ));
    tracing::info!(
        "Location services initialized (auto_apply={}, confirm={}, apply_on_confirm={})",
        config.matching.auto_apply_threshold,
        config.matching.confirm_threshold,
        config.matching.apply_on_confirm
    );

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(locations_routes(
            location_service,
            search_service,
            session_service,
        ))
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
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
    socket.listen(4096)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
