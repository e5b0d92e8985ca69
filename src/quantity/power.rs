use std::ops::Mul;

use chrono::TimeDelta;

use crate::quantity::energy::WattSeconds;

quantity!(Watts, "W");

impl Mul<TimeDelta> for Watts {
    type Output = WattSeconds;

    /// Integrate the power over the time span, assuming it stays constant.
    fn mul(self, rhs: TimeDelta) -> Self::Output {
        WattSeconds(self.0 * rhs.as_seconds_f64())
    }
}
