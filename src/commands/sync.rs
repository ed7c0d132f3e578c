use anyhow::{Context, Result};
use calmerge_core::{CycleReport, run_cycle};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::CalmergeConfig;

pub async fn run(config_path: Option<&str>, once: bool) -> Result<()> {
    let cfg = CalmergeConfig::load(config_path)?;
    let settings = cfg.sync_settings();
    let remote = super::connect(&cfg)?;

    info!(
        provider = remote.provider_name(),
        environment = %cfg.environment,
        sources = settings.source_calendar_ids.len(),
        destination = %settings.destination_calendar_id,
        interval_mins = cfg.sync_interval_mins,
        "Starting calmerge"
    );

    if settings.delete_all {
        warn!("delete_all is set: every destination event in the window will be removed");
    }

    loop {
        match run_cycle(&remote, &settings, Utc::now()).await {
            Ok(report) => print_summary(&report),
            Err(e) if e.is_fatal() => {
                return Err(e).context("Stopping: an event could not be published");
            }
            Err(e) => {
                if once {
                    return Err(e).context("Sync failed");
                }
                error!(error = %e, "Sync cycle aborted, retrying after the interval");
            }
        }

        if once {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(cfg.sync_interval()) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                return Ok(());
            }
        }
    }
}

fn print_summary(report: &CycleReport) {
    println!(
        "completed, {} added, {} removed, {} skipped",
        report.apply.added, report.apply.removed, report.apply.skipped
    );

    if report.duplicates > 0 {
        println!("  {} duplicate events ignored", report.duplicates);
    }

    if !report.apply.has_failures() {
        return;
    }

    for failure in report
        .apply
        .failed_inserts
        .iter()
        .chain(&report.apply.failed_removals)
    {
        println!("  ⚠ {}", failure);
    }
}
