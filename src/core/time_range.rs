use std::str::FromStr;

use chrono::{DateTime, Local, TimeDelta};

use crate::prelude::*;

/// Trailing display window, one per dashboard button.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, derive_more::Display)]
pub enum TimeRange {
    #[default]
    #[display("24h")]
    Day,

    #[display("1h")]
    Hour,

    #[display("30m")]
    HalfHour,

    #[display("10m")]
    TenMinutes,
}

impl TimeRange {
    pub const ALL: [Self; 4] = [Self::Day, Self::Hour, Self::HalfHour, Self::TenMinutes];

    /// Pick the range from the fired triggers.
    ///
    /// Exactly one trigger wins; no trigger or several simultaneous ones fall back to the default.
    pub fn select(triggers: impl IntoIterator<Item = Self>) -> Self {
        let mut triggers = triggers.into_iter();
        match (triggers.next(), triggers.next()) {
            (Some(trigger), None) => trigger,
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn duration(self) -> TimeDelta {
        match self {
            Self::Day => TimeDelta::hours(24),
            Self::Hour => TimeDelta::hours(1),
            Self::HalfHour => TimeDelta::minutes(30),
            Self::TenMinutes => TimeDelta::minutes(10),
        }
    }

    #[must_use]
    pub fn start(self, now: DateTime<Local>) -> DateTime<Local> {
        now - self.duration()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "Last 24 hours",
            Self::Hour => "Last hour",
            Self::HalfHour => "Last 30 minutes",
            Self::TenMinutes => "Last 10 minutes",
        }
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|range| range.to_string() == value)
            .with_context(|| format!("unknown time range `{value}`"))
    }
}
