use chrono::{DateTime, Local, TimeDelta};

/// A time series point.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, derive_more::Constructor)]
pub struct Point<V> {
    pub time: DateTime<Local>,
    pub value: V,
}

impl<V> Point<V> {
    /// Whether the point is still inside the trailing window ending at `now`.
    #[must_use]
    pub fn is_within(&self, now: DateTime<Local>, window: TimeDelta) -> bool {
        now - self.time <= window
    }
}
