//! Bubble timestamps.

use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clock style used for every timestamp in the transcript.
///
/// Fixed by configuration; there is no runtime toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    /// Zero-padded `HH:MM`.
    #[default]
    #[serde(rename = "24h")]
    H24,
    /// `H:MM AM|PM`, with 0 and 12 both shown as 12.
    #[serde(rename = "12h")]
    H12,
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "24h" => Ok(TimeFormat::H24),
            "12h" => Ok(TimeFormat::H12),
            other => Err(format!("Unknown time format: {other} (expected 24h or 12h)")),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::H24 => write!(f, "24h"),
            TimeFormat::H12 => write!(f, "12h"),
        }
    }
}

/// Format the hour and minute of `time` for display.
///
/// Uses the clock fields as-is; callers pass local time.
pub fn format_time<T: Timelike>(time: &T, format: TimeFormat) -> String {
    let hour = time.hour();
    let minute = time.minute();
    match format {
        TimeFormat::H24 => format!("{:02}:{:02}", hour, minute),
        TimeFormat::H12 => {
            let suffix = if hour >= 12 { "PM" } else { "AM" };
            let hour = match hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{}:{:02} {}", hour, minute, suffix)
        }
    }
}

/// Format the current local time.
pub fn format_now(format: TimeFormat) -> String {
    format_time(&Local::now(), format)
}
