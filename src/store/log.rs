use chrono::{DateTime, Local, TimeDelta};

use crate::{
    core::{flow::PowerFlow, point::Point, totals::EnergyTotals},
    quantity::energy::KilowattHours,
};

/// Append-only time series kept in the insertion order.
///
/// Each record carries all of its values, so the series of a log can never get out of sync.
#[must_use]
#[derive(Clone, Debug, PartialEq, derive_more::From)]
pub struct Log<V>(Vec<Point<V>>);

pub type SampleLog = Log<PowerFlow>;

pub type StatisticsLog = Log<EnergyTotals<KilowattHours>>;

impl<V> Default for Log<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> Log<V> {
    pub fn append(&mut self, point: Point<V>) {
        self.0.push(point);
    }

    /// Drop every point that fell out of the trailing window ending at `now`.
    ///
    /// Returns the number of dropped points.
    pub fn trim(&mut self, now: DateTime<Local>, window: TimeDelta) -> usize {
        let len_before = self.0.len();
        self.0.retain(|point| point.is_within(now, window));
        len_before - self.0.len()
    }

    /// Points at or after the `start`, in the log order.
    pub fn since(&self, start: DateTime<Local>) -> impl Iterator<Item = &Point<V>> {
        self.0.iter().filter(move |point| point.time >= start)
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Point<V>> {
        self.0.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point<V>> {
        self.0.iter()
    }
}
