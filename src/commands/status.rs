use anyhow::{Context, Result};
use calmerge_core::apply::sorted_by_start;
use calmerge_core::{CalendarEvent, Consolidation};
use chrono::Utc;

use crate::config::CalmergeConfig;

/// Compute the next cycle's changes without touching any calendar.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    let cfg = CalmergeConfig::load(config_path)?;
    let remote = super::connect(&cfg)?;

    // Listing only: never purge duplicates from here
    let settings = calmerge_core::SyncSettings {
        cleanup_duplicates: false,
        ..cfg.sync_settings()
    };

    let plan = Consolidation::prepare(&remote, &settings, Utc::now())
        .await
        .context("Failed to compute changes")?;

    println!(
        "Window: {} → {}",
        plan.window.start.format("%Y-%m-%d"),
        plan.window.end.format("%Y-%m-%d")
    );
    println!(
        "Source events: {}, destination events: {}",
        plan.sources.mapping.len(),
        plan.destination.mapping.len()
    );

    if plan.delta.is_empty() {
        println!("\nEverything up to date.");
        return Ok(());
    }

    if !plan.delta.to_add.is_empty() {
        println!("\nTo add:");
        for event in sorted_by_start(plan.delta.to_add.events()) {
            match settings.blacklist.matching_word(event) {
                Some(word) => println!("   - {} (blacklisted: {})", describe(event), word),
                None => println!("   + {}", describe(event)),
            }
        }
    }

    if !plan.delta.to_remove.is_empty() {
        println!("\nTo remove:");
        for event in sorted_by_start(plan.delta.to_remove.events()) {
            println!("   - {}", describe(event));
        }
    }

    let duplicates = plan
        .sources
        .duplicates
        .iter()
        .chain(&plan.destination.duplicates);

    for duplicate in duplicates {
        println!("\n⚠ Duplicate in {}: {}", duplicate.calendar_id, duplicate.key);
    }

    Ok(())
}

fn describe(event: &CalendarEvent) -> String {
    format!("{} ({} → {})", event.summary, event.start, event.end)
}
