mod runner;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::Config;
use market::{resolve_universe, BinanceFuturesClient, MarketDataManager};
use notify::{LogNotifier, Notifier, TelegramNotifier};
use signal::{RegimeTracker, SignalFileConfig};

use runner::Runner;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let signal_cfg = SignalFileConfig::load(&cfg.signal_config_path);
    info!(
        poll_interval_secs = cfg.poll_interval_secs,
        fetch_concurrency = cfg.fetch_concurrency,
        "CrossBot starting"
    );

    // ── Exchange connectivity ─────────────────────────────────────────────────
    let client = BinanceFuturesClient::new(cfg.binance_api_key.clone());
    client.ping().await.unwrap_or_else(|e| {
        panic!("Binance futures API unreachable, check network and BINANCE_API_KEY: {e}")
    });
    info!("Binance futures API reachable");

    // ── Symbol universe ───────────────────────────────────────────────────────
    let symbols = resolve_universe(&client, &signal_cfg.universe)
        .await
        .unwrap_or_else(|e| panic!("Failed to resolve symbol universe: {e}"));

    // ── Notifier ──────────────────────────────────────────────────────────────
    let notifier: Arc<dyn Notifier> = if cfg.telegram_enabled() {
        let token = cfg.telegram_token.as_deref().unwrap_or_default();
        Arc::new(TelegramNotifier::new(token, &cfg.telegram_chat_ids))
    } else {
        info!("Telegram not configured, alerts go to the log only");
        Arc::new(LogNotifier)
    };
    let _ = notifier
        .send_status(&format!(
            "🤖 CrossBot started — monitoring {} symbols every {}s",
            symbols.len(),
            cfg.poll_interval_secs
        ))
        .await;

    // ── Polling runner ────────────────────────────────────────────────────────
    let thresholds = signal_cfg.thresholds;
    let runner = Runner {
        manager: MarketDataManager::new(
            client,
            thresholds.ema_fast_period,
            thresholds.ema_slow_period,
        ),
        tracker: RegimeTracker::new(),
        notifier: notifier.clone(),
        thresholds,
        symbols,
        poll_interval: Duration::from_secs(cfg.poll_interval_secs),
        fetch_concurrency: cfg.fetch_concurrency,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runner_task = tokio::spawn(runner.run(shutdown_rx));

    // ── Shutdown ──────────────────────────────────────────────────────────────
    tokio::signal::ctrl_c()
        .await
        .unwrap_or_else(|e| panic!("Failed to listen for shutdown signal: {e}"));
    info!("Shutdown signal received, finishing current cycle");
    let _ = shutdown_tx.send(true);
    let _ = runner_task.await;

    let _ = notifier.send_status("🛑 CrossBot stopped").await;
    info!("CrossBot stopped");
}
