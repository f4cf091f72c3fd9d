use anyhow::Result;
use hostmon::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!("Starting {}", version::banner());

    let source = sysinfo_source::SysinfoSource::new(app_config.network.monitoring_enabled);
    let renderer = render::ConsoleRenderer::new();
    let sink: Option<Box<dyn monitor::LogSink>> = if app_config.logging.enable_logging {
        match log_sink::CsvLogSink::open(std::path::Path::new(&app_config.logging.log_path)) {
            Ok(s) => {
                tracing::info!(path = %app_config.logging.log_path, "sample log enabled");
                Some(Box::new(s))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "open_log",
                    "could not open sample log; running without logging"
                );
                None
            }
        }
    } else {
        None
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let mut monitor_handle = monitor::spawn(
        monitor::MonitorDeps {
            source: Box::new(source),
            renderer: Box::new(renderer),
            sink,
            shutdown_rx,
        },
        app_config.monitor_config(),
    );

    tokio::select! {
        result = &mut monitor_handle => {
            // The loop only returns after a shutdown request; getting here
            // without one means the task died.
            match result {
                Ok(summary) => tracing::warn!(
                    ticks = summary.ticks,
                    "monitor stopped unexpectedly"
                ),
                Err(e) => tracing::error!(error = %e, "monitor task failed"),
            }
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            match monitor_handle.await {
                Ok(summary) => tracing::info!(
                    ticks = summary.ticks,
                    ticks_skipped = summary.ticks_skipped,
                    samples_logged = summary.samples_logged,
                    alerts_raised = summary.alerts_raised,
                    "shutdown complete"
                ),
                Err(e) => tracing::error!(error = %e, "monitor task failed during shutdown"),
            }
        }
    }

    Ok(())
}
