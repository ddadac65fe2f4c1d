//!
//! Account/identity microservice entry point.
//! Reads configuration from TOML file (~/.config/account-service/config.toml).

use std::sync::Arc;
use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use account_service::auth::{AuthState, TokenService};
use account_service::config::AppConfig;
use account_service::domain::{AccountRepository, AdminRepository};
use account_service::infrastructure::database::migrator::Migrator;
use account_service::infrastructure::{SeaOrmAccountRepository, SeaOrmAdminRepository};
use account_service::notifications::{DisabledNotifier, Notifier, WebhookNotifier};
use account_service::support::{RequestGuard, ShutdownCoordinator};
use account_service::{
    create_api_router, default_config_path, init_database, ApiState, DatabaseConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("ACCOUNT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            let mut cfg = AppConfig::default();
            cfg.apply_env_overrides();
            cfg
        }
    };

    info!("Starting account service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("📊 Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Create default super admin if not exists
    create_default_super_admin(&db, &app_cfg).await;

    // ── Repositories ───────────────────────────────────────────
    let accounts: Arc<dyn AccountRepository> = Arc::new(SeaOrmAccountRepository::new(db.clone()));
    let admins: Arc<dyn AdminRepository> = Arc::new(SeaOrmAdminRepository::new(db.clone()));

    // Token service owns the signing key; fixed for the process lifetime
    let tokens = TokenService::new(app_cfg.security.jwt_config());
    info!(
        "JWT configured with {}h token expiration",
        app_cfg.security.jwt_expiration_hours
    );

    // ── Notification trigger client ────────────────────────────
    let notifier: Arc<dyn Notifier> = if app_cfg.notifier.enabled {
        info!("Notification trigger endpoint: {}", app_cfg.notifier.endpoint);
        Arc::new(WebhookNotifier::new(app_cfg.notifier.endpoint.clone()))
    } else {
        info!("Notification dispatch disabled");
        Arc::new(DisabledNotifier)
    };

    // ── Shutdown coordination and per-request guard ────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    let guard = RequestGuard::new(
        shutdown_signal.clone(),
        Duration::from_secs(app_cfg.server.request_deadline_secs),
    );

    // ── Router with the composed middleware chain ──────────────
    let state = ApiState {
        accounts,
        admins,
        tokens: tokens.clone(),
        notifier,
        guard,
    };
    let auth_state = AuthState::new(tokens, app_cfg.security.public_paths.clone());
    let router = create_api_router(state, auth_state, prometheus_handle);

    let addr: std::net::SocketAddr = app_cfg.server.address().parse()?;

    // ── Serve (TLS when cert + key are configured) ─────────────
    if let (Some(cert), Some(key)) = (&app_cfg.tls.cert_path, &app_cfg.tls.key_path) {
        let rustls_config = RustlsConfig::from_pem_file(cert, key).await?;
        info!("API server listening on https://{}", addr);

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        let grace = shutdown.timeout();
        let signal = shutdown_signal.clone();
        tokio::spawn(async move {
            signal.wait().await;
            info!("🛑 API server received shutdown signal");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        axum_server::bind_rustls(addr, rustls_config)
            .handle(handle)
            .serve(router.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("API server listening on http://{}", addr);

        let signal = shutdown_signal.clone();
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move {
                signal.wait().await;
                info!("🛑 API server received shutdown signal");
            })
            .await?;
    }

    // Perform final cleanup
    info!("🧹 Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("✅ Database connection closed");
    }

    info!("👋 Account service shutdown complete");
    Ok(())
}

/// Create a default super admin if no admins exist
async fn create_default_super_admin(db: &sea_orm::DatabaseConnection, app_cfg: &AppConfig) {
    use account_service::auth::hash_password;
    use account_service::infrastructure::database::entities::admin::{self, AdminLevel};
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    let admin_count = admin::Entity::find().count(db).await.unwrap_or(0);

    if admin_count == 0 {
        info!("Creating default super admin...");

        let password_hash = match hash_password(&app_cfg.admin.password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash admin password: {}", e);
                return;
            }
        };

        let now = chrono::Utc::now();
        let admin = admin::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            first_name: Set(app_cfg.admin.first_name.clone()),
            last_name: Set(app_cfg.admin.last_name.clone()),
            email: Set(app_cfg.admin.email.clone()),
            phone: Set(String::new()),
            username: Set(app_cfg.admin.username.clone()),
            level: Set(AdminLevel::SuperAdmin),
            trusted_devices: Set("[]".to_string()),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match admin.insert(db).await {
            Ok(_) => {
                info!("Default super admin created: {}", app_cfg.admin.username);
                info!("⚠️  Please change the admin password immediately!");
            }
            Err(e) => {
                error!("Failed to create default super admin: {}", e);
            }
        }
    }
}
