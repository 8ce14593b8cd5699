use crate::cli::ServeArgs;
use crate::infra::{media_store, seeded_catalog, AppState};
use crate::routes::with_listing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sqft_listings::config::AppConfig;
use sqft_listings::error::AppError;
use sqft_listings::listings::{AdminGate, ListingApi};
use sqft_listings::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(seed) = args.seed.take() {
        config.seed_csv = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let media = media_store();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        media: media.clone(),
    };

    let catalog = seeded_catalog(config.seed_csv.as_deref(), media)?;
    let gate = AdminGate::from_config(&config.admin);
    if gate.is_enabled() {
        info!(
            session_ttl_minutes = gate.ttl().num_minutes(),
            "admin gate enabled"
        );
    } else {
        warn!("ADMIN_PASSWORD is not set; admin routes will reject every request");
    }
    let api = Arc::new(ListingApi::new(catalog, gate, config.site.clone()));

    let app = with_listing_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, site = %config.site.base_url, "listings service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
