use chrono::{Local, TimeDelta};
use clap::Parser;

use crate::{
    cli::storage::StorageArgs,
    prelude::*,
    tables::{build_samples_table, build_totals_table},
};

#[derive(Parser)]
pub struct TotalsArgs {
    /// Only summarize the samples within this window.
    #[clap(long, env = "RETENTION", default_value = "24h")]
    retention: humantime::Duration,

    #[clap(flatten)]
    storage: StorageArgs,
}

impl TotalsArgs {
    pub fn run(&self) -> Result {
        let (mut samples, statistics) = self.storage.storage().load();
        samples.trim(Local::now(), TimeDelta::from_std(*self.retention)?);
        match statistics.latest() {
            Some(latest) => println!("{}", build_totals_table(latest)),
            None => warn!("no statistics recorded yet"),
        }
        println!("{}", build_samples_table(&samples));
        Ok(())
    }
}
