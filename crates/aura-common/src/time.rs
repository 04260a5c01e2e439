//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Shared primitives and utilities for the core runtime."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::time::Duration;

use chrono::{Local, NaiveTime, Timelike};

/// Current local time of day, truncated to the minute.
pub fn local_time_of_day() -> NaiveTime {
    let now = Local::now().time();
    fixed_stamp(now.hour(), now.minute())
}

/// Build a stamp for a scripted entry. Out-of-range input saturates to midnight.
pub fn fixed_stamp(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Render a stamp the way the dashboard shows it, e.g. `09:30 AM`.
pub fn clock_label(stamp: NaiveTime) -> String {
    stamp.format("%I:%M %p").to_string()
}

/// Convert a duration into milliseconds, saturating at `u64::MAX`.
pub fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
