use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Look-back windows offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInterval {
    FifteenMin,
    #[default]
    ThirtyMin,
    OneHour,
    TwoHour,
    FourHour,
}

impl TimeInterval {
    /// Window length in minutes, as passed to the price API
    pub fn minutes(&self) -> u32 {
        match self {
            TimeInterval::FifteenMin => 15,
            TimeInterval::ThirtyMin => 30,
            TimeInterval::OneHour => 60,
            TimeInterval::TwoHour => 120,
            TimeInterval::FourHour => 240,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeInterval::FifteenMin => "Last 15 minutes",
            TimeInterval::ThirtyMin => "Last 30 minutes",
            TimeInterval::OneHour => "Last 1 hour",
            TimeInterval::TwoHour => "Last 2 hours",
            TimeInterval::FourHour => "Last 4 hours",
        }
    }

    /// All presets in ascending order
    pub fn all() -> [TimeInterval; 5] {
        [
            TimeInterval::FifteenMin,
            TimeInterval::ThirtyMin,
            TimeInterval::OneHour,
            TimeInterval::TwoHour,
            TimeInterval::FourHour,
        ]
    }

    pub fn from_minutes(minutes: u32) -> Option<TimeInterval> {
        Self::all().into_iter().find(|i| i.minutes() == minutes)
    }
}

impl FromStr for TimeInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_lowercase();
        let minutes = trimmed
            .strip_suffix('m')
            .or_else(|| trimmed.strip_suffix("min"))
            .unwrap_or(&trimmed);

        minutes
            .parse::<u32>()
            .ok()
            .and_then(TimeInterval::from_minutes)
            .ok_or_else(|| {
                anyhow!(
                    "Invalid time interval: '{}'. Valid options: 15, 30, 60, 120, 240",
                    s
                )
            })
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
