use std::sync::Arc;

use auth::Authenticator;
use auth::CredentialCodec;
use shop_service::bootstrap::ensure_admin;
use shop_service::config::Config;
use shop_service::domain::account::service::AccountService;
use shop_service::domain::category::service::CategoryService;
use shop_service::domain::guard::CreationGuard;
use shop_service::domain::session::service::SessionService;
use shop_service::domain::session::store::RefreshTokenStore;
use shop_service::inbound::http::policy::AccessPolicy;
use shop_service::inbound::http::router::create_router;
use shop_service::outbound::repositories::PostgresAccountRepository;
use shop_service::outbound::repositories::PostgresCategoryRepository;
use shop_service::outbound::repositories::PostgresRefreshTokenRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "shop-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_ttl_minutes = config.jwt.access_ttl_minutes,
        refresh_ttl_hours = config.jwt.refresh_ttl_hours,
        custom_rules = config.authorization.rules.len(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let codec = Arc::new(CredentialCodec::new(
        config.jwt.secret.as_bytes(),
        config.jwt.access_ttl(),
        config.jwt.refresh_ttl(),
    )?);
    let authenticator = Arc::new(Authenticator::new(Arc::clone(&codec)));

    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool.clone()));
    let category_repository = Arc::new(PostgresCategoryRepository::new(pg_pool.clone()));
    let refresh_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));

    let refresh_store = Arc::new(RefreshTokenStore::new(
        refresh_repository,
        config.jwt.refresh_ttl(),
        Arc::clone(codec.clock()),
    ));

    let account_service = Arc::new(AccountService::new(
        Arc::clone(&account_repository),
        Arc::new(CreationGuard::new()),
    ));
    let category_service = Arc::new(CategoryService::new(
        category_repository,
        Arc::new(CreationGuard::new()),
    ));
    let session_service = Arc::new(SessionService::new(
        account_repository,
        refresh_store,
        authenticator,
    ));

    if let Some(admin) = ensure_admin(account_service.as_ref(), &config.bootstrap).await? {
        tracing::info!(account_id = %admin.id, "Bootstrap administrator created");
    }

    let policy = if config.authorization.rules.is_empty() {
        AccessPolicy::default()
    } else {
        AccessPolicy::new(config.authorization.rules.clone())
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        account_service,
        category_service,
        session_service,
        codec,
        Arc::new(policy),
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
    }

    Ok(())
}
