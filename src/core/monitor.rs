use chrono::{DateTime, Local, TimeDelta};

use crate::{
    api::power_source::PhasePower,
    core::{
        flow::PowerFlow,
        point::Point,
        totals::{EnergyTotals, RunningTotals},
    },
    prelude::*,
    quantity::{energy::KilowattHours, power::Watts},
    store::{SampleLog, StatisticsLog, Storage},
};

/// Energy accounting pipeline: classify → accumulate → retain.
///
/// Owns all the mutable state. Saving is optional and runs separately, see [`Monitor::save_job`].
#[must_use]
#[derive(bon::Builder)]
pub struct Monitor {
    /// Energy attributed to each recorded tick.
    tick_duration: TimeDelta,

    retention: TimeDelta,

    storage: Option<Storage>,

    #[builder(skip)]
    totals: RunningTotals,

    #[builder(skip)]
    samples: SampleLog,

    #[builder(skip)]
    statistics: StatisticsLog,

    #[builder(skip)]
    status: Status,
}

/// What happened to a single tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Recorded(PowerFlow),

    /// All the phases read exactly zero: nothing is appended, and the totals stay.
    Idle,

    Failed,
}

/// Immutable view published after every tick.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub samples: SampleLog,
    pub totals: EnergyTotals<KilowattHours>,
    pub status: Status,
}

#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Status {
    pub last_reading_at: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

impl Monitor {
    /// Restore the logs from the storage, if any.
    ///
    /// The lifetime totals are picked up from the latest statistics snapshot before trimming,
    /// so they survive downtimes longer than the retention window.
    pub fn restore(mut self, now: DateTime<Local>) -> Self {
        if let Some(storage) = &self.storage {
            let (samples, statistics) = storage.load();
            if let Some(latest) = statistics.latest() {
                self.totals = latest.value.into();
                info!(
                    total_consumption = %latest.value.total_consumption,
                    surplus_energy = %latest.value.surplus_energy,
                    generated_energy = %latest.value.generated_energy,
                    "restored the totals",
                );
            }
            self.samples = samples;
            self.statistics = statistics;
            self.trim(now);
        }
        self
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn record(&mut self, now: DateTime<Local>, phase_power: Result<PhasePower>) -> Outcome {
        let phase_power = match phase_power {
            Ok(phase_power) => phase_power,
            Err(error) => {
                warn!("skipping the tick: {error:#}");
                self.status.last_error = Some(format!("{error:#}"));
                return Outcome::Failed;
            }
        };
        self.status.last_reading_at = Some(now);
        self.status.last_error = None;

        if phase_power.iter().all(|power| *power == Watts::ZERO) {
            debug!("all phases read zero, skipping the tick");
            return Outcome::Idle;
        }

        let flow = PowerFlow::classify(&phase_power);
        self.totals.accumulate(flow, self.tick_duration);
        self.samples.append(Point::new(now, flow));
        self.statistics.append(Point::new(now, self.totals.into()));
        self.trim(now);
        Outcome::Recorded(flow)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            samples: self.samples.clone(),
            totals: self.totals.into(),
            status: self.status.clone(),
        }
    }

    fn trim(&mut self, now: DateTime<Local>) {
        let n_samples = self.samples.trim(now, self.retention);
        let n_snapshots = self.statistics.trim(now, self.retention);
        if n_samples != 0 || n_snapshots != 0 {
            debug!(n_samples, n_snapshots, "trimmed");
        }
    }

    /// Detached save of the current logs, meant to run off the async thread.
    ///
    /// `None` when the persistence is disabled.
    pub fn save_job(&self) -> Option<impl FnOnce() + Send + 'static> {
        let storage = self.storage.clone()?;
        let samples = self.samples.clone();
        let statistics = self.statistics.clone();
        Some(move || {
            if let Err(error) = storage.save(&samples, &statistics) {
                error!("failed to save the logs: {error:#}");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::quantity::energy::WattSeconds;

    fn monitor() -> Monitor {
        Monitor::builder()
            .tick_duration(TimeDelta::seconds(1))
            .retention(TimeDelta::hours(24))
            .build()
    }

    #[test]
    fn test_record_importing() {
        let mut monitor = monitor();
        let outcome = monitor.record(Local::now(), Ok([Watts(120.0), Watts(-30.0), Watts(0.0)]));
        assert_eq!(outcome, Outcome::Recorded(PowerFlow::new(Watts(120.0), Watts(30.0))));
        assert_eq!(monitor.totals.total_consumption, WattSeconds(120.0));
        assert_eq!(monitor.totals.generated_energy, WattSeconds(30.0));
        assert_eq!(monitor.totals.surplus_energy, WattSeconds::ZERO);
        assert_eq!(monitor.samples.len(), 1);
        assert_eq!(monitor.statistics.len(), 1);
    }

    #[test]
    fn test_all_zero_is_skipped() {
        let mut monitor = monitor();
        monitor.record(Local::now(), Ok([Watts(-10.0), Watts(-5.0), Watts(-5.0)]));
        let totals = monitor.totals;

        let outcome = monitor.record(Local::now(), Ok([Watts::ZERO; 3]));

        assert_eq!(outcome, Outcome::Idle);
        assert_eq!(monitor.totals, totals);
        assert_eq!(monitor.samples.len(), 1);
        assert_eq!(monitor.totals.surplus_energy, WattSeconds(20.0));
    }

    #[test]
    fn test_failure_is_skipped_and_reported() {
        let mut monitor = monitor();
        let outcome = monitor.record(Local::now(), Err(anyhow!("timed out")));
        assert_eq!(outcome, Outcome::Failed);
        assert!(monitor.samples.is_empty());
        assert_eq!(monitor.snapshot().status.last_error.as_deref(), Some("timed out"));

        monitor.record(Local::now(), Ok([Watts(1.0), Watts(0.0), Watts(0.0)]));
        assert_eq!(monitor.snapshot().status.last_error, None);
    }

    #[test]
    fn test_old_samples_are_trimmed() {
        let mut monitor = monitor();
        let now = Local::now();
        monitor.record(now - TimeDelta::hours(25), Ok([Watts(1.0), Watts(0.0), Watts(0.0)]));
        monitor.record(now, Ok([Watts(2.0), Watts(0.0), Watts(0.0)]));
        assert_eq!(monitor.samples.len(), 1);
        assert_eq!(monitor.statistics.len(), 1);
        assert_eq!(monitor.totals.total_consumption, WattSeconds(3.0));
    }

    #[test]
    fn test_restore_totals_and_logs() -> Result {
        let directory = tempdir()?;
        let storage = Storage::new(
            directory.path().join("data_log.json"),
            directory.path().join("statistics_log.json"),
        );
        let now = Local::now();

        let mut monitor = Monitor::builder()
            .tick_duration(TimeDelta::seconds(1))
            .retention(TimeDelta::hours(24))
            .storage(storage.clone())
            .build();
        monitor.record(now, Ok([Watts(3_600.0), Watts(-1_800.0), Watts(0.0)]));
        let save = monitor.save_job().context("the persistence must be enabled")?;
        save();

        let restored = Monitor::builder()
            .tick_duration(TimeDelta::seconds(1))
            .retention(TimeDelta::hours(24))
            .storage(storage)
            .build()
            .restore(now + TimeDelta::seconds(1));
        assert_eq!(restored.samples, monitor.samples);
        assert_eq!(restored.statistics, monitor.statistics);
        approx::assert_abs_diff_eq!(restored.totals.total_consumption.0, 3_600.0, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(restored.totals.generated_energy.0, 1_800.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_restore_totals_outlive_retention() -> Result {
        let directory = tempdir()?;
        let storage = Storage::new(
            directory.path().join("data_log.json"),
            directory.path().join("statistics_log.json"),
        );
        let then = Local::now() - TimeDelta::days(3);
        let mut monitor = Monitor::builder()
            .tick_duration(TimeDelta::seconds(1))
            .retention(TimeDelta::hours(24))
            .storage(storage.clone())
            .build();
        monitor.record(then, Ok([Watts(500.0), Watts(0.0), Watts(0.0)]));
        let save = monitor.save_job().context("the persistence must be enabled")?;
        save();

        let restored = Monitor::builder()
            .tick_duration(TimeDelta::seconds(1))
            .retention(TimeDelta::hours(24))
            .storage(storage)
            .build()
            .restore(Local::now());
        assert!(restored.samples.is_empty());
        assert!(restored.statistics.is_empty());
        approx::assert_abs_diff_eq!(restored.totals.total_consumption.0, 500.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_no_save_job_without_storage() {
        let mut monitor = monitor();
        monitor.record(Local::now(), Ok([Watts(1.0), Watts(0.0), Watts(0.0)]));
        assert!(monitor.save_job().is_none());
    }
}
