mod probe;
mod serve;
mod shelly;
mod storage;
mod totals;

use clap::{Parser, Subcommand};

use crate::cli::{probe::ProbeArgs, serve::ServeArgs, totals::TotalsArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: poll the meter and serve the live dashboard.
    #[clap(name = "serve")]
    Serve(Box<ServeArgs>),

    /// Print the persisted running totals and the retained sample window.
    #[clap(name = "totals")]
    Totals(TotalsArgs),

    /// Read the meter once and print the power flow.
    #[clap(name = "probe")]
    Probe(ProbeArgs),
}
