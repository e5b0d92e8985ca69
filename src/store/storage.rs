use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    prelude::*,
    store::{
        SampleLog,
        StatisticsLog,
        columns::{SampleColumns, StatisticsColumns},
    },
};

/// Flat JSON files holding the sample and statistics logs.
#[must_use]
#[derive(Clone, Debug)]
pub struct Storage {
    samples_path: PathBuf,
    statistics_path: PathBuf,
}

impl Storage {
    pub fn new(samples_path: impl Into<PathBuf>, statistics_path: impl Into<PathBuf>) -> Self {
        Self { samples_path: samples_path.into(), statistics_path: statistics_path.into() }
    }

    /// Read both logs.
    ///
    /// A missing file reads as an empty log. An unreadable one is reported and reads as empty, too.
    #[instrument(skip_all)]
    pub fn load(&self) -> (SampleLog, StatisticsLog) {
        let samples = Self::read_or_default::<SampleColumns, SampleLog>(&self.samples_path);
        let statistics =
            Self::read_or_default::<StatisticsColumns, StatisticsLog>(&self.statistics_path);
        info!(n_samples = samples.len(), n_snapshots = statistics.len(), "loaded");
        (samples, statistics)
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn save(&self, samples: &SampleLog, statistics: &StatisticsLog) -> Result {
        write_json(&self.samples_path, &SampleColumns::from(samples))?;
        write_json(&self.statistics_path, &StatisticsColumns::from(statistics))?;
        Ok(())
    }

    fn read_or_default<C, L>(path: &Path) -> L
    where
        C: DeserializeOwned,
        L: Default + TryFrom<C, Error = Error>,
    {
        read_json::<C>(path)
            .and_then(|columns| columns.map(L::try_from).transpose())
            .unwrap_or_else(|error| {
                error!(path = %path.display(), "failed to load, starting empty: {error:#}");
                None
            })
            .unwrap_or_default()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let contents =
        fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    serde_json::from_slice(&contents)
        .map(Some)
        .with_context(|| format!("failed to deserialize `{}`", path.display()))
}

/// Write into a sibling temporary file and move it over the target.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result {
    let mut temporary_path = path.as_os_str().to_owned();
    temporary_path.push(".tmp");
    let temporary_path = PathBuf::from(temporary_path);
    fs::write(&temporary_path, serde_json::to_vec(value)?)
        .with_context(|| format!("failed to write `{}`", temporary_path.display()))?;
    fs::rename(&temporary_path, path)
        .with_context(|| format!("failed to replace `{}`", path.display()))
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeDelta};
    use tempfile::tempdir;

    use super::*;
    use crate::{
        core::{flow::PowerFlow, point::Point, totals::EnergyTotals},
        quantity::{energy::KilowattHours, power::Watts},
    };

    fn storage_in(directory: &Path) -> Storage {
        Storage::new(directory.join("data_log.json"), directory.join("statistics_log.json"))
    }

    #[test]
    fn test_missing_files_load_empty() -> Result {
        let directory = tempdir()?;
        let (samples, statistics) = storage_in(directory.path()).load();
        assert!(samples.is_empty());
        assert!(statistics.is_empty());
        Ok(())
    }

    #[test]
    fn test_round_trip() -> Result {
        let directory = tempdir()?;
        let storage = storage_in(directory.path());
        let now = Local::now();
        let samples = SampleLog::from(vec![
            Point::new(now - TimeDelta::seconds(2), PowerFlow::new(Watts(0.1), Watts(0.2))),
            Point::new(now - TimeDelta::seconds(1), PowerFlow::new(Watts(1.0 / 3.0), Watts::ZERO)),
            Point::new(now - TimeDelta::seconds(1), PowerFlow::new(Watts(1e-7), Watts(2_345.678))),
        ]);
        let statistics = StatisticsLog::from(vec![Point::new(
            now,
            EnergyTotals {
                total_consumption: KilowattHours(0.123_456_789),
                surplus_energy: KilowattHours(2.0 / 3.0),
                generated_energy: KilowattHours::ZERO,
            },
        )]);

        storage.save(&samples, &statistics)?;
        let (loaded_samples, loaded_statistics) = storage.load();

        assert_eq!(loaded_samples, samples);
        assert_eq!(loaded_statistics, statistics);
        for (loaded, original) in loaded_samples.iter().zip(samples.iter()) {
            assert_eq!(loaded.value.consumption.0.to_bits(), original.value.consumption.0.to_bits());
            assert_eq!(loaded.value.feed_in.0.to_bits(), original.value.feed_in.0.to_bits());
        }
        Ok(())
    }

    #[test]
    fn test_corrupt_file_loads_empty() -> Result {
        let directory = tempdir()?;
        let storage = storage_in(directory.path());
        fs::write(directory.path().join("data_log.json"), b"{\"timestamps\": [")?;
        let (samples, _) = storage.load();
        assert!(samples.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_leaves_no_temporary_file() -> Result {
        let directory = tempdir()?;
        storage_in(directory.path()).save(&SampleLog::default(), &StatisticsLog::default())?;
        assert!(directory.path().join("data_log.json").is_file());
        assert!(!directory.path().join("data_log.json.tmp").exists());
        Ok(())
    }
}
