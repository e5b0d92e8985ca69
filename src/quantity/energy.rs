use crate::quantity::power::Watts;

quantity!(WattSeconds, "Ws");
quantity!(KilowattHours, "kWh");

impl WattSeconds {
    pub const PER_KILOWATT_HOUR: f64 = 3_600_000.0;
}

impl From<WattSeconds> for KilowattHours {
    fn from(value: WattSeconds) -> Self {
        Self(value.0 / WattSeconds::PER_KILOWATT_HOUR)
    }
}

impl From<KilowattHours> for WattSeconds {
    fn from(value: KilowattHours) -> Self {
        Self(value.0 * Self::PER_KILOWATT_HOUR)
    }
}

impl From<Watts> for WattSeconds {
    /// Energy of the power sustained for exactly one second.
    fn from(watts: Watts) -> Self {
        Self(watts.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_to_kilowatt_hours() {
        assert_abs_diff_eq!(KilowattHours::from(WattSeconds(3_600_000.0)).0, 1.0);
        assert_abs_diff_eq!(KilowattHours::from(WattSeconds(120.0)).0, 120.0 / 3_600_000.0);
    }

    #[test]
    fn test_from_kilowatt_hours() {
        assert_abs_diff_eq!(WattSeconds::from(KilowattHours(0.5)).0, 1_800_000.0);
    }

    #[test]
    fn test_display_respects_precision() {
        assert_eq!(format!("{:.4}", KilowattHours(0.123_456)), "0.1235 kWh");
        assert_eq!(format!("{:.2}", KilowattHours(1.0)), "1.00 kWh");
    }
}
