use chrono::{DateTime, Local};
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{
        monitor::{Snapshot, Status},
        time_range::TimeRange,
        totals::EnergyTotals,
    },
    dashboard::figure::{Figure, Metric},
    quantity::energy::KilowattHours,
};

/// Everything the dashboard page shows for the selected time range.
#[must_use]
#[serde_as]
#[derive(Debug, Serialize)]
pub struct View {
    #[serde_as(as = "DisplayFromStr")]
    pub range: TimeRange,

    pub label: &'static str,

    pub start: DateTime<Local>,
    pub n_samples: usize,
    pub figures: Figures,
    pub totals: TotalTexts,
    pub status: Status,
}

#[must_use]
#[derive(Debug, Serialize)]
pub struct Figures {
    pub consumption: Figure,
    pub feed_in: Figure,
    pub net_usage: Figure,
    pub combined: Figure,
}

#[must_use]
#[derive(Debug, Serialize)]
pub struct TotalTexts {
    pub total_consumption: String,
    pub surplus_energy: String,
    pub generated_energy: String,
}

impl From<EnergyTotals<KilowattHours>> for TotalTexts {
    fn from(totals: EnergyTotals<KilowattHours>) -> Self {
        Self {
            total_consumption: format!("Consumption: {:.4}", totals.total_consumption),
            surplus_energy: format!("Surplus: {:.4}", totals.surplus_energy),
            generated_energy: format!("Generated: {:.4}", totals.generated_energy),
        }
    }
}

impl View {
    pub fn render(snapshot: &Snapshot, range: TimeRange, now: DateTime<Local>) -> Self {
        let start = range.start(now);
        let samples: Vec<_> = snapshot.samples.since(start).collect();
        Self {
            range,
            label: range.label(),
            start,
            n_samples: samples.len(),
            figures: Figures {
                consumption: Figure::single(Metric::Consumption, samples.iter().copied()),
                feed_in: Figure::single(Metric::FeedIn, samples.iter().copied()),
                net_usage: Figure::single(Metric::NetUsage, samples.iter().copied()),
                combined: Figure::combined(&samples),
            },
            totals: snapshot.totals.into(),
            status: snapshot.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::{
        core::{flow::PowerFlow, point::Point},
        prelude::*,
        quantity::power::Watts,
        store::SampleLog,
    };

    fn snapshot(now: DateTime<Local>) -> Snapshot {
        Snapshot {
            samples: SampleLog::from(vec![
                Point::new(now - TimeDelta::hours(2), PowerFlow::new(Watts(1.0), Watts::ZERO)),
                Point::new(now - TimeDelta::minutes(20), PowerFlow::new(Watts(2.0), Watts::ZERO)),
                Point::new(now - TimeDelta::minutes(5), PowerFlow::new(Watts(3.0), Watts(4.0))),
            ]),
            totals: EnergyTotals {
                total_consumption: KilowattHours(1.234_56),
                surplus_energy: KilowattHours(0.000_04),
                generated_energy: KilowattHours::ZERO,
            },
            status: Status::default(),
        }
    }

    #[test]
    fn test_range_filters_samples() {
        let now = Local::now();
        let snapshot = snapshot(now);
        assert_eq!(View::render(&snapshot, TimeRange::Day, now).n_samples, 3);
        assert_eq!(View::render(&snapshot, TimeRange::Hour, now).n_samples, 2);
        assert_eq!(View::render(&snapshot, TimeRange::HalfHour, now).n_samples, 2);
        let view = View::render(&snapshot, TimeRange::TenMinutes, now);
        assert_eq!(view.n_samples, 1);
        assert_eq!(view.figures.net_usage.data[0].y, [Watts(-1.0)]);
        assert_eq!(view.start, now - TimeDelta::minutes(10));
    }

    #[test]
    fn test_total_texts() {
        let view = View::render(&snapshot(Local::now()), TimeRange::Day, Local::now());
        assert_eq!(view.totals.total_consumption, "Consumption: 1.2346 kWh");
        assert_eq!(view.totals.surplus_energy, "Surplus: 0.0000 kWh");
        assert_eq!(view.totals.generated_energy, "Generated: 0.0000 kWh");
    }

    #[test]
    fn test_empty_snapshot_renders() -> Result {
        let view = View::render(&Snapshot::default(), TimeRange::Hour, Local::now());
        assert_eq!(view.n_samples, 0);
        let value = serde_json::to_value(&view)?;
        assert_eq!(value["range"], "1h");
        assert_eq!(value["label"], "Last hour");
        assert_eq!(value["figures"]["combined"]["data"][2]["x"], serde_json::json!([]));
        Ok(())
    }
}
