use clap::Parser;

use crate::{
    api::power_source::PowerSource,
    cli::shelly::ShellyArgs,
    core::flow::PowerFlow,
    prelude::*,
    tables::build_probe_table,
};

#[derive(Parser)]
pub struct ProbeArgs {
    #[clap(flatten)]
    shelly: ShellyArgs,
}

impl ProbeArgs {
    pub async fn run(&self) -> Result {
        let phase_power = self.shelly.client()?.get_phase_power().await;
        println!("{}", build_probe_table(&phase_power, PowerFlow::classify(&phase_power)));
        Ok(())
    }
}
