use mimalloc::MiMalloc;
use quote_seeder::api::build_http_client;
use quote_seeder::config::Config;
use quote_seeder::db::{QuoteStore, connect};
use quote_seeder::router::{QuoteState, quote_router};
use quote_seeder::service::seed_source::BlobSeedSource;
use quote_seeder::{SeedCoordinator, api::blob_api::redact};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        database = %cfg.database.database_path().display(),
        seed_url = %cfg.seed.blob_url.as_ref().map(redact).unwrap_or_default(),
        sas_token = if cfg.seed.sas_token().is_some() { "<set>" } else { "<none>" },
        proxy = %cfg.http.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.basic.loglevel,
    );

    let store = QuoteStore::new(connect(&cfg.database));
    let http = build_http_client(&cfg.http)?;
    let source = BlobSeedSource::from_config(&cfg, http)?;

    // Not awaited before serving: early requests may see an empty table.
    let seeding = SeedCoordinator::new(store.clone(), source).spawn();

    let app = quote_router(QuoteState::new(store));
    let listener = TcpListener::bind(cfg.basic.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    let abort_seeding = seeding.abort_handle();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Rows already inserted stay; the in-flight statement is dropped.
            abort_seeding.abort();
        })
        .await?;

    match seeding.await {
        Ok(outcome) => info!(phase = %outcome.phase(), "seeding finished"),
        Err(e) if e.is_cancelled() => warn!("seeding cancelled by shutdown"),
        Err(e) => warn!(error = %e, "seeding task failed"),
    }
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
