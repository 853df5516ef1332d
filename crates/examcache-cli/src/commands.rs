//! Maintenance commands over the offline store.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use examcache_core::OfflineStore;

fn require_storage(store: &OfflineStore) -> Result<()> {
    if store.is_available() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("No local storage available"))
    }
}

/// Print queued results, oldest first.
pub fn list_pending(store: &OfflineStore) -> Result<()> {
    require_storage(store)?;

    let pending = store.get_pending_results()?;
    if pending.is_empty() {
        println!("No pending results.");
        return Ok(());
    }

    for result in &pending {
        println!(
            "{}  test {}  student {}  score {}/{}",
            result.submitted_at.to_rfc3339(),
            result.test_id,
            result.student_id,
            result.score,
            result.total_questions
        );
    }
    println!("{} pending result(s).", pending.len());
    Ok(())
}

pub fn clear(store: &OfflineStore, test_id: &str) -> Result<()> {
    require_storage(store)?;
    store.clear_test(test_id)?;
    println!("Cleared cached test {}.", test_id);
    Ok(())
}

pub fn discard(store: &OfflineStore, timestamps: &[String]) -> Result<()> {
    require_storage(store)?;

    let submitted_at = parse_timestamps(timestamps)?;
    let removed = store.remove_pending_results(&submitted_at)?;
    println!("Removed {} pending result(s).", removed);
    Ok(())
}

fn parse_timestamps(raw: &[String]) -> Result<Vec<DateTime<Utc>>> {
    raw.iter()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("Invalid timestamp: {}", s))
        })
        .collect()
}
