use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, Request, header};
use axum::response::Response;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use veats_api::config::{Config, Environment};
use veats_api::services::AccountService;
use veats_api::state::AppState;

const DEV_FRONTEND_ORIGIN: &str = "http://localhost:3001";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        code_ttl_secs = config.verification.code_ttl_secs,
        max_attempts = config.verification.max_attempts,
        "starting V-Eats API"
    );

    let db = prepare_database(&config).await?;
    let app = build_app(AppState {
        db,
        config: config.clone(),
    });

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Connect, bring the schema up to date and seed the admin account when configured.
async fn prepare_database(config: &Config) -> anyhow::Result<DatabaseConnection> {
    let db = veats_api::db::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("schema up to date");

    match &config.admin_seed {
        Some(seed) => AccountService::ensure_superuser(&db, seed).await?,
        None => tracing::debug!("no ADMIN_* variables set, skipping admin seed"),
    }
    Ok(db)
}

fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                status_code = tracing::field::Empty,
            )
        })
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status_code", response.status().as_u16());
            tracing::info!(latency_ms = latency.as_millis(), "response");
        });

    veats_api::routes::router()
        .with_state(state)
        .layer(cors)
        .layer(trace)
}

/// Production only answers the configured frontend. `Location` is exposed so the
/// client can follow permission redirects itself.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.environment != Environment::Production {
        return CorsLayer::permissive();
    }

    let origin = config.frontend_url.parse::<HeaderValue>().unwrap_or_else(|_| {
        tracing::warn!(frontend_url = %config.frontend_url, "unusable FRONTEND_URL");
        HeaderValue::from_static(DEV_FRONTEND_ORIGIN)
    });

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::LOCATION])
        .max_age(Duration::from_secs(3600))
}

fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("veats_api={log_level},tower_http=info,sea_orm=warn").into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
