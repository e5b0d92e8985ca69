use chrono::TimeDelta;

use crate::{
    core::flow::PowerFlow,
    quantity::energy::{KilowattHours, WattSeconds},
};

/// Lifetime energy counters.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EnergyTotals<T> {
    /// Energy drawn from the grid.
    pub total_consumption: T,

    /// Energy exported while the net usage was negative.
    pub surplus_energy: T,

    /// Energy fed in on the exporting phases.
    pub generated_energy: T,
}

/// Running totals as they are accumulated tick by tick.
pub type RunningTotals = EnergyTotals<WattSeconds>;

impl RunningTotals {
    /// Add the contribution of the power flow sustained over the `duration`.
    pub fn accumulate(&mut self, flow: PowerFlow, duration: TimeDelta) {
        self.total_consumption += flow.consumption * duration;
        if flow.is_exporting() {
            self.surplus_energy += flow.net_usage.abs() * duration;
        }
        self.generated_energy += flow.feed_in * duration;
    }
}

impl<T> EnergyTotals<T> {
    pub fn map<R>(self, f: impl Fn(T) -> R) -> EnergyTotals<R> {
        EnergyTotals {
            total_consumption: f(self.total_consumption),
            surplus_energy: f(self.surplus_energy),
            generated_energy: f(self.generated_energy),
        }
    }
}

impl From<RunningTotals> for EnergyTotals<KilowattHours> {
    fn from(totals: RunningTotals) -> Self {
        totals.map(KilowattHours::from)
    }
}

impl From<EnergyTotals<KilowattHours>> for RunningTotals {
    fn from(totals: EnergyTotals<KilowattHours>) -> Self {
        totals.map(WattSeconds::from)
    }
}
