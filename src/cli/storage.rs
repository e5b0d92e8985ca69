use std::path::PathBuf;

use clap::Parser;

use crate::store::Storage;

#[derive(Parser)]
pub struct StorageArgs {
    #[clap(long, env = "DATA_LOG_PATH", default_value = "data_log.json")]
    data_log_path: PathBuf,

    #[clap(long, env = "STATISTICS_LOG_PATH", default_value = "statistics_log.json")]
    statistics_log_path: PathBuf,
}

impl StorageArgs {
    pub fn storage(&self) -> Storage {
        Storage::new(&self.data_log_path, &self.statistics_log_path)
    }
}
