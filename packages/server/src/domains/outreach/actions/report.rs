//! Writing and locating outreach report files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::domains::outreach::models::OutreachReport;

pub const REPORT_PREFIX: &str = "support_outreach_";

pub fn report_file_name(now: chrono::DateTime<Local>) -> String {
    format!("{}{}.json", REPORT_PREFIX, now.format("%Y%m%d_%H%M%S"))
}

/// Write `report` into `dir`. Returns `None` without touching the disk when
/// the report has no results.
pub fn write_report(dir: &Path, report: &OutreachReport) -> Result<Option<PathBuf>> {
    if report.results.is_empty() {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(report_file_name(Local::now()));
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    Ok(Some(path))
}

/// Most recently modified `support_outreach_*.json` in `dir`.
pub fn find_latest_report(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to list {}", dir.display()));
        }
    };

    let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(REPORT_PREFIX) || !name.ends_with(".json") {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
            latest = Some((modified, entry.path()));
        }
    }

    Ok(latest.map(|(_, path)| path))
}

pub fn read_report(path: &Path) -> Result<OutreachReport> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Invalid report {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn empty_report() -> OutreachReport {
        OutreachReport {
            scan_timestamp: "2025-01-01T00:00:00Z".into(),
            query: String::new(),
            total_posts_scanned: 3,
            negative_posts_found: 0,
            results: vec![],
        }
    }

    #[test]
    fn file_name_format() {
        let at = Local.with_ymd_and_hms(2025, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(report_file_name(at), "support_outreach_20250309_070501.json");
    }

    #[test]
    fn empty_report_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_report(dir.path(), &empty_report()).unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn latest_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_latest_report(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();
        std::fs::write(dir.path().join("support_outreach_1.json"), "{}").unwrap();
        let latest = find_latest_report(dir.path()).unwrap().unwrap();
        assert!(latest.ends_with("support_outreach_1.json"));
    }

    #[test]
    fn missing_dir_has_no_report() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_latest_report(&dir.path().join("absent")).unwrap().is_none());
    }
}
