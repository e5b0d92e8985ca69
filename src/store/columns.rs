//! Columnar on-disk shapes of the logs: one array per series, aligned by index.

use chrono::{DateTime, Local};
use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::{
    core::{flow::PowerFlow, point::Point, totals::EnergyTotals},
    prelude::*,
    quantity::{energy::KilowattHours, power::Watts},
    store::{SampleLog, StatisticsLog},
};

#[derive(Default, Serialize, Deserialize)]
pub struct SampleColumns {
    timestamps: Vec<DateTime<Local>>,
    consumption: Vec<Watts>,
    feed_in: Vec<Watts>,
    net_usage: Vec<Watts>,
}

impl From<&SampleLog> for SampleColumns {
    fn from(log: &SampleLog) -> Self {
        let mut this = Self::default();
        for sample in log.iter() {
            this.timestamps.push(sample.time);
            this.consumption.push(sample.value.consumption);
            this.feed_in.push(sample.value.feed_in);
            this.net_usage.push(sample.value.net_usage);
        }
        this
    }
}

impl TryFrom<SampleColumns> for SampleLog {
    type Error = Error;

    fn try_from(columns: SampleColumns) -> Result<Self> {
        let n_timestamps = columns.timestamps.len();
        ensure!(
            (columns.consumption.len() == n_timestamps)
                && (columns.feed_in.len() == n_timestamps)
                && (columns.net_usage.len() == n_timestamps),
            "sample log series have different lengths",
        );
        Ok(Self::from(
            izip!(columns.timestamps, columns.consumption, columns.feed_in, columns.net_usage)
                .map(|(timestamp, consumption, feed_in, net_usage)| {
                    Point::new(timestamp, PowerFlow { consumption, feed_in, net_usage })
                })
                .collect::<Vec<_>>(),
        ))
    }
}

#[derive(Default, Serialize, Deserialize)]
pub struct StatisticsColumns {
    timestamps: Vec<DateTime<Local>>,
    total_consumption: Vec<KilowattHours>,
    surplus_energy: Vec<KilowattHours>,
    generated_energy: Vec<KilowattHours>,
}

impl From<&StatisticsLog> for StatisticsColumns {
    fn from(log: &StatisticsLog) -> Self {
        let mut this = Self::default();
        for snapshot in log.iter() {
            this.timestamps.push(snapshot.time);
            this.total_consumption.push(snapshot.value.total_consumption);
            this.surplus_energy.push(snapshot.value.surplus_energy);
            this.generated_energy.push(snapshot.value.generated_energy);
        }
        this
    }
}

impl TryFrom<StatisticsColumns> for StatisticsLog {
    type Error = Error;

    fn try_from(columns: StatisticsColumns) -> Result<Self> {
        let n_timestamps = columns.timestamps.len();
        ensure!(
            (columns.total_consumption.len() == n_timestamps)
                && (columns.surplus_energy.len() == n_timestamps)
                && (columns.generated_energy.len() == n_timestamps),
            "statistics log series have different lengths",
        );
        Ok(Self::from(
            izip!(
                columns.timestamps,
                columns.total_consumption,
                columns.surplus_energy,
                columns.generated_energy,
            )
            .map(|(timestamp, total_consumption, surplus_energy, generated_energy)| {
                Point::new(
                    timestamp,
                    EnergyTotals { total_consumption, surplus_energy, generated_energy },
                )
            })
            .collect::<Vec<_>>(),
        ))
    }
}
