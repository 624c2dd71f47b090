//! VIGIL, a price-threshold alert daemon.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! connects the alert store, and runs the fetch→load→evaluate loop
//! with graceful shutdown. A failed tick is logged and skipped; the
//! daemon keeps running.

use anyhow::Result;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use vigil::config;
use vigil::engine::Monitor;
use vigil::notify::{LogNotifier, Notifier, WebhookNotifier};
use vigil::quotes::CoinbaseClient;
use vigil::store::MongoAlertStore;
use vigil::types::TickReport;

const BANNER: &str = r#"
__     _____ ____ ___ _
\ \   / /_ _/ ___|_ _| |
 \ \ / / | | |  _ | || |
  \ V /| | | |_| || || |___
   \_/ |___\____|___|_____|

  Price-threshold watchdog for crypto markets
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = config::AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        pair = %cfg.monitor.currency_pair,
        poll_interval_secs = cfg.monitor.poll_interval_secs,
        database = %cfg.database.database,
        collection = %cfg.database.collection,
        "VIGIL starting up"
    );

    // -- Initialise components -------------------------------------------

    let mongo_uri = config::AppConfig::resolve_env(&cfg.database.uri_env)?;
    let store = MongoAlertStore::connect(
        &mongo_uri,
        &cfg.database.database,
        &cfg.database.collection,
    )
    .await?;

    let source = CoinbaseClient::new(
        &cfg.quotes.base_url,
        &cfg.monitor.currency_pair,
        cfg.quotes.timeout_secs,
    )?;

    let notifier: Box<dyn Notifier> = match &cfg.notifier.webhook_url {
        Some(url) => {
            info!(url = %url, "Using webhook notifier");
            Box::new(WebhookNotifier::new(url, cfg.quotes.timeout_secs)?)
        }
        None => {
            info!("No webhook configured, fired alerts will only be logged");
            Box::new(LogNotifier)
        }
    };

    let monitor = Monitor::new(Box::new(source), Box::new(store), notifier);

    // -- Main loop -------------------------------------------------------

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.monitor.poll_interval_secs));
    // The tick is awaited inline below, so ticks can never overlap; a
    // slow tick delays the next one instead of causing a catch-up burst.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.monitor.poll_interval_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    let mut tick: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                tick += 1;
                match monitor.run_tick().await {
                    Ok(report) => log_tick_report(tick, &report),
                    Err(e) => {
                        error!(tick, error = %e, "Tick failed, skipping to next interval");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(ticks = tick, "VIGIL shut down cleanly.");
    Ok(())
}

/// Log a human-readable tick summary.
fn log_tick_report(tick: u64, report: &TickReport) {
    info!(
        tick,
        buy = report.buy_price,
        sell = report.sell_price,
        checked = report.alerts_checked,
        fired = report.alerts_fired,
        stale = report.stale_updates,
        "Tick complete"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vigil=info"));

    let json_logging = std::env::var("VIGIL_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
