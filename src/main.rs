mod core;
mod features;
mod modules;
mod shared;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, http::StatusCode, middleware::from_fn, routing::get, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{Config, SwaggerConfig};
use crate::core::middleware::AuthState;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::approvals::{routes as approvals_routes, ApprovalService};
use crate::features::auth::{self, AccountResolver};
use crate::features::desa::{routes as desa_routes, DesaService};
use crate::features::files::{routes as files_routes, FileService};
use crate::features::investments::{routes as investments_routes, InvestmentService};
use crate::features::locations::{routes as locations_routes, LocationService};
use crate::features::recommendations::{
    routes as recommendations_routes, RecommendationEngine, RecommendationService,
};
use crate::features::regions::{routes as regions_routes, RegionService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::gemini::{GeminiClient, TextGenerator};
use crate::modules::logto::{IdentityProvider, LogtoManagementClient, LogtoTokenManager};
use crate::modules::storage::MinIOClient;
use crate::shared::prompts;

/// One instance of every feature service, shared by the routers
struct Services {
    approvals: Arc<ApprovalService>,
    locations: Arc<LocationService>,
    investments: Arc<InvestmentService>,
    desa: Arc<DesaService>,
    regions: Arc<RegionService>,
    recommendations: Arc<RecommendationService>,
    users: Arc<UserService>,
    files: Arc<FileService>,
}

fn main() -> anyhow::Result<()> {
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?
        .block_on(serve(worker_threads))
}

fn init_tracing() {
    // RUST_LOG may come from .env, so read it before building the filter
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(worker_threads: usize) -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Starting Kompas Pacitan: workers={}, pid={}",
        worker_threads,
        std::process::id()
    );

    let pool = database::create_pool(&config.database).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database ready, migrations applied");

    let jwks_client = Arc::new(auth::JwksClient::new(
        &config.auth.issuer,
        config.auth.jwks_cache_ttl,
    ));
    let auth_state = AuthState {
        validator: Arc::new(auth::JwtValidator::new(
            jwks_client,
            config.auth.issuer.clone(),
            config.auth.audience.clone(),
            config.auth.jwt_leeway,
        )),
        resolver: Arc::new(AccountResolver::new(pool.clone())),
    };

    let identity: Arc<dyn IdentityProvider> = Arc::new(LogtoManagementClient::new(Arc::new(
        LogtoTokenManager::new(config.logto_m2m.clone()),
    )));

    // Creates the bucket and the public-read policy on the image prefix
    let minio = Arc::new(
        MinIOClient::new(config.minio.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Object storage unavailable: {}", e))?,
    );

    let engine = Arc::new(RecommendationEngine::new(text_generator(&config)));

    let services = Services {
        approvals: Arc::new(ApprovalService::new(pool.clone())),
        locations: Arc::new(LocationService::new(pool.clone())),
        investments: Arc::new(InvestmentService::new(pool.clone())),
        desa: Arc::new(DesaService::new(pool.clone())),
        regions: Arc::new(RegionService::new(pool.clone())),
        recommendations: Arc::new(RecommendationService::new(pool.clone(), engine)),
        users: Arc::new(UserService::new(
            pool.clone(),
            identity,
            config.app.owner_email.clone(),
        )),
        files: Arc::new(FileService::new(pool, minio)),
    };

    let app = Router::new()
        .merge(docs_router(&config.swagger))
        .merge(protected_router(&services, auth_state))
        .merge(public_router(services))
        .route("/health", get(|| async { StatusCode::OK }))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
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
        // Uses the client's X-Request-Id when present, UUID v7 otherwise
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let listener = bind_listener(&addr)?;
    tracing::info!("Listening on http://{} (docs at /swagger-ui/)", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Gemini when a key is configured; `None` makes every recommendation
/// the fallback
fn text_generator(config: &Config) -> Option<Arc<dyn TextGenerator>> {
    for template in [
        prompts::LOCATION_ANALYSIS_TEMPLATE,
        prompts::INVESTMENT_RECOMMENDATION_TEMPLATE,
    ] {
        if !prompts::engine::template_exists(template) {
            tracing::warn!("Prompt template '{}' is missing", template);
        }
    }

    match GeminiClient::from_config(&config.gemini) {
        Ok(Some(client)) => {
            tracing::info!("Gemini enabled (model: {})", config.gemini.model);
            Some(Arc::new(client) as Arc<dyn TextGenerator>)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Gemini disabled: {}", e);
            None
        }
    }
}

fn docs_router(swagger: &SwaggerConfig) -> Router {
    let mut openapi = ApiDoc::openapi();
    SwaggerInfoModifier {
        title: swagger.title.clone(),
        version: swagger.version.clone(),
        description: swagger.description.clone(),
    }
    .modify(&mut openapi);

    let ui = Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));
    match swagger.credentials() {
        Some(credentials) => {
            tracing::info!("Swagger UI protected with basic auth");
            ui.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
        }
        None => ui,
    }
}

/// Routes behind bearer-token verification; guards inside each handler
/// decide profile and role requirements
fn protected_router(services: &Services, auth_state: AuthState) -> Router {
    Router::new()
        .merge(users_routes::routes(Arc::clone(&services.users)))
        .merge(locations_routes::routes(
            Arc::clone(&services.locations),
            Arc::clone(&services.approvals),
        ))
        .merge(investments_routes::routes(
            Arc::clone(&services.investments),
            Arc::clone(&services.approvals),
        ))
        .merge(desa_routes::routes(Arc::clone(&services.desa)))
        .merge(approvals_routes::routes(Arc::clone(&services.approvals)))
        .merge(recommendations_routes::routes(Arc::clone(
            &services.recommendations,
        )))
        .merge(files_routes::routes(Arc::clone(&services.files)))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ))
}

/// Catalog reads, regions and username checks for anonymous visitors
fn public_router(services: Services) -> Router {
    Router::new()
        .merge(regions_routes::routes(services.regions))
        .merge(locations_routes::public_routes(
            services.locations,
            Arc::clone(&services.approvals),
        ))
        .merge(investments_routes::public_routes(
            services.investments,
            services.approvals,
        ))
        .merge(desa_routes::public_routes(services.desa))
        .merge(recommendations_routes::public_routes(
            services.recommendations,
        ))
        .merge(users_routes::public_routes(services.users))
}

fn bind_listener(addr: &str) -> anyhow::Result<tokio::net::TcpListener> {
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address {}: {}", addr, e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(Duration::from_secs(60));
    #[cfg(target_os = "linux")]
    let keepalive = keepalive
        .with_interval(Duration::from_secs(10))
        .with_retries(3);
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+C handler failed: {}", e);
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
                tracing::error!("SIGTERM handler failed: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
