use crate::quantity::power::Watts;

/// Instantaneous power flow at the grid connection, derived from the per-phase readings.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerFlow {
    /// Sum of the positive phase readings: power drawn from the grid.
    pub consumption: Watts,

    /// Absolute sum of the negative phase readings: power exported to the grid.
    pub feed_in: Watts,

    /// Consumption minus feed-in; negative means net export.
    pub net_usage: Watts,
}

impl PowerFlow {
    pub fn new(consumption: Watts, feed_in: Watts) -> Self {
        Self { consumption, feed_in, net_usage: consumption - feed_in }
    }

    pub fn classify(readings: &[Watts]) -> Self {
        let consumption = readings.iter().copied().filter(|power| *power > Watts::ZERO).sum();
        let feed_in = readings
            .iter()
            .copied()
            .filter(|power| *power < Watts::ZERO)
            .sum::<Watts>()
            .abs();
        Self::new(consumption, feed_in)
    }

    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.net_usage < Watts::ZERO
    }
}
