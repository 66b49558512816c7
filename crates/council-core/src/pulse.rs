//! The daily pulse — goal, blockers, feedback and mood for one calendar day.
//!
//! Layout:
//!   context/YYYY-MM-DD.json   — one pulse per day
//!   context/latest.json       — copy of the most recent capture
//!   context/context.json      — seed pulse, used when no capture exists yet
//!
//! A pulse is written once by `council pulse` and only read afterwards.

use crate::error::{CouncilError, Result};
use crate::io;
use crate::paths::{Layout, DATE_FORMAT};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder stored for optional answers left blank.
pub const NOT_SPECIFIED: &str = "Not specified";

/// How many prior days of pulses feed each run.
pub const HISTORY_DAYS: u64 = 7;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pulse {
    pub date: String,
    pub goal: String,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub user_feedback: Vec<String>,
    #[serde(default)]
    pub energy_level: String,
    #[serde(default)]
    pub emotional_state: String,
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

impl Pulse {
    /// Load today's context: `latest.json`, falling back to `context.json`.
    ///
    /// Both missing is fatal: a run cannot proceed without a pulse.
    pub fn load_current(layout: &Layout) -> Result<Self> {
        let latest = layout.latest_pulse();
        if let Some(pulse) = read(&latest)? {
            tracing::info!(path = %latest.display(), "loaded current pulse");
            return Ok(pulse);
        }
        let initial = layout.initial_pulse();
        tracing::info!(
            "{} not found, trying {}",
            latest.display(),
            initial.display()
        );
        if let Some(pulse) = read(&initial)? {
            tracing::info!(path = %initial.display(), "loaded initial pulse");
            return Ok(pulse);
        }
        Err(CouncilError::PulseNotFound {
            latest: latest.display().to_string(),
            initial: initial.display().to_string(),
        })
    }

    /// Load the pulses of the `days` calendar days before `today`, oldest first.
    ///
    /// Missing days are expected and skipped silently. Unreadable or corrupt
    /// files are logged and skipped; history is never fatal.
    pub fn load_history(layout: &Layout, today: NaiveDate, days: u64) -> Vec<Self> {
        let mut history: Vec<Self> = (1..=days)
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .filter_map(|date| {
                let path = layout.pulse_for(date);
                match read(&path) {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping pulse history file");
                        None
                    }
                }
            })
            .collect();
        // ISO dates order lexically.
        history.sort_by(|a, b| a.date.cmp(&b.date));
        tracing::info!(count = history.len(), days, "loaded pulse history");
        history
    }

    /// Write `context/<date>.json`, then copy it over `context/latest.json`.
    pub fn save(&self, layout: &Layout) -> Result<()> {
        let date = self.parsed_date()?;
        let data = serde_json::to_string_pretty(self)?;
        let daily = layout.pulse_for(date);
        io::atomic_write(&daily, data.as_bytes())?;
        tracing::info!(path = %daily.display(), "saved daily pulse");
        io::atomic_write(&layout.latest_pulse(), data.as_bytes())?;
        tracing::info!(path = %layout.latest_pulse().display(), "updated latest pulse");
        Ok(())
    }

    pub fn parsed_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|_| CouncilError::InvalidDate(self.date.clone()))
    }
}

fn read(path: &Path) -> Result<Option<Pulse>> {
    let Some(data) = io::read_optional(path)? else {
        return Ok(None);
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|source| CouncilError::InvalidPulse {
            path: path.display().to_string(),
            source,
        })
}

/// Split a comma-separated answer into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Use `answer` unless it is blank.
pub fn or_not_specified(answer: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        answer.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pulse(date: &str, goal: &str) -> Pulse {
        Pulse {
            date: date.to_string(),
            goal: goal.to_string(),
            blockers: vec!["flaky CI".to_string()],
            user_feedback: vec![],
            energy_level: "Medium".to_string(),
            emotional_state: "Focused".to_string(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let original = Pulse {
            user_feedback: vec!["love the export".into(), "onboarding slow".into()],
            ..pulse("2024-01-01", "Ship v1")
        };
        original.save(&layout).unwrap();

        assert_eq!(Pulse::load_current(&layout).unwrap(), original);
        let daily = std::fs::read_to_string(layout.pulse_for(day(1))).unwrap();
        let latest = std::fs::read_to_string(layout.latest_pulse()).unwrap();
        assert_eq!(daily, latest);
    }

    #[test]
    fn same_day_capture_overwrites() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        pulse("2024-01-01", "first").save(&layout).unwrap();
        pulse("2024-01-01", "second").save(&layout).unwrap();
        assert_eq!(Pulse::load_current(&layout).unwrap().goal, "second");
    }

    #[test]
    fn load_current_falls_back_to_initial() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let seed = pulse("2023-12-31", "seed");
        io::atomic_write(
            &layout.initial_pulse(),
            serde_json::to_string(&seed).unwrap().as_bytes(),
        )
        .unwrap();
        assert_eq!(Pulse::load_current(&layout).unwrap(), seed);
    }

    #[test]
    fn load_current_missing_both_is_pulse_not_found() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let err = Pulse::load_current(&layout).unwrap_err();
        assert!(matches!(err, CouncilError::PulseNotFound { .. }));
    }

    #[test]
    fn load_current_corrupt_latest_is_invalid_pulse() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        io::atomic_write(&layout.latest_pulse(), b"{not json").unwrap();
        let err = Pulse::load_current(&layout).unwrap_err();
        assert!(matches!(err, CouncilError::InvalidPulse { .. }));
    }

    #[test]
    fn history_skips_missing_days_and_orders_oldest_first() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let today = day(10);
        // Two and five days back.
        pulse("2024-01-08", "two back").save(&layout).unwrap();
        pulse("2024-01-05", "five back").save(&layout).unwrap();

        let history = Pulse::load_history(&layout, today, HISTORY_DAYS);
        let goals: Vec<_> = history.iter().map(|p| p.goal.as_str()).collect();
        assert_eq!(goals, ["five back", "two back"]);
    }

    #[test]
    fn history_ignores_today_and_days_beyond_window() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        pulse("2024-01-10", "today").save(&layout).unwrap();
        pulse("2024-01-02", "eight back").save(&layout).unwrap();
        assert!(Pulse::load_history(&layout, day(10), 7).is_empty());
    }

    #[test]
    fn history_skips_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        io::atomic_write(&layout.pulse_for(day(9)), b"garbage").unwrap();
        pulse("2024-01-08", "good").save(&layout).unwrap();
        let history = Pulse::load_history(&layout, day(10), 7);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].goal, "good");
    }

    #[test]
    fn save_rejects_malformed_date() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let err = pulse("Jan 1", "x").save(&layout).unwrap_err();
        assert!(matches!(err, CouncilError::InvalidDate(_)));
    }

    #[test]
    fn split_list_drops_blank_entries() {
        assert_eq!(
            split_list(" flaky CI, ,slow review ,,"),
            vec!["flaky CI".to_string(), "slow review".to_string()]
        );
        assert!(split_list("   ").is_empty());
    }

    #[test]
    fn or_not_specified_defaults_blank() {
        assert_eq!(or_not_specified("  "), NOT_SPECIFIED);
        assert_eq!(or_not_specified(" High "), "High");
    }
}
