use super::ui;
use crate::core::dashboard::{DashboardSources, load_dashboard};
use crate::core::refresh::run_periodic;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Re-renders the dashboard every `period` until interrupted or until
/// `cycles` refreshes have run.
pub async fn run(
    sources: Arc<DashboardSources>,
    period: Duration,
    cycles: Option<usize>,
) -> Result<()> {
    info!(?period, ?cycles, "Starting dashboard refresh loop");

    let refresh = run_periodic(period, cycles, move || {
        let sources = Arc::clone(&sources);
        async move {
            let context = load_dashboard(&sources).await;
            println!("{}", context.display_as_tables());
            println!(
                "{}",
                ui::style_text(
                    &format!("Refreshing every {}s, Ctrl-C to stop", period.as_secs()),
                    ui::StyleType::Subtle
                )
            );
            ui::print_separator();
        }
    });

    tokio::select! {
        started = refresh => {
            info!(started, "Refresh loop finished");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, stopping refresh loop");
        }
    }
    Ok(())
}
