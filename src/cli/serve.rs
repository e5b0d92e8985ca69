use std::{net::Ipv4Addr, sync::Arc, time::Duration};

use bon::Builder;
use chrono::{Local, TimeDelta};
use clap::Parser;
use tokio::{
    net::TcpListener,
    select,
    sync::watch,
    task::spawn_blocking,
    time::{MissedTickBehavior, interval},
};

use crate::{
    api::power_source::PowerSource,
    cli::{shelly::ShellyArgs, storage::StorageArgs},
    core::monitor::{Monitor, Outcome, Snapshot},
    dashboard::server::{router, serve},
    prelude::*,
};

#[derive(Parser)]
pub struct ServeArgs {
    #[clap(long, env = "PORT", default_value = "8050")]
    port: u16,

    /// Also the duration attributed to every recorded reading.
    #[clap(long, env = "POLLING_INTERVAL", default_value = "1s")]
    polling_interval: humantime::Duration,

    #[clap(long, env = "RETENTION", default_value = "24h")]
    retention: humantime::Duration,

    /// Keep everything in memory only.
    #[clap(long = "no-persistence", env = "NO_PERSISTENCE")]
    no_persistence: bool,

    /// Always show the last 24 hours and hide the range buttons.
    #[clap(long = "no-time-ranges", env = "NO_TIME_RANGES")]
    no_time_ranges: bool,

    #[clap(flatten)]
    shelly: ShellyArgs,

    #[clap(flatten)]
    storage: StorageArgs,
}

impl ServeArgs {
    fn polling_interval(&self) -> Result<Duration> {
        let polling_interval = Duration::from(self.polling_interval);
        ensure!(!polling_interval.is_zero(), "the polling interval must be positive");
        Ok(polling_interval)
    }

    pub async fn run(self) -> Result {
        let polling_interval = self.polling_interval()?;
        let monitor = Monitor::builder()
            .tick_duration(TimeDelta::from_std(polling_interval)?)
            .retention(TimeDelta::from_std(*self.retention)?)
            .maybe_storage((!self.no_persistence).then(|| self.storage.storage()))
            .build()
            .restore(Local::now());
        let (sender, receiver) = watch::channel(Arc::new(monitor.snapshot()));

        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, self.port))
            .await
            .with_context(|| format!("failed to bind to port {}", self.port))?;
        let router = router()
            .snapshots(receiver)
            .refresh_interval(polling_interval)
            .time_ranges_enabled(!self.no_time_ranges)
            .call();

        let poller = Poller::builder()
            .source(self.shelly.client()?)
            .monitor(monitor)
            .sender(sender)
            .interval(polling_interval)
            .build();

        // The poller never finishes on its own, so this ends with the server.
        select! {
            result = serve(listener, router) => result,
            result = poller.run() => result,
        }
    }
}

/// Single owner of the monitor: ticks, records, and publishes the snapshots.
#[derive(Builder)]
struct Poller<S> {
    source: S,
    monitor: Monitor,
    sender: watch::Sender<Arc<Snapshot>>,

    #[builder(into)]
    interval: Duration,
}

impl<S: PowerSource> Poller<S> {
    async fn run(mut self) -> Result {
        let mut interval = interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    async fn tick(&mut self) {
        let phase_power = self.source.try_get_phase_power().await;
        if let Outcome::Recorded(flow) = self.monitor.record(Local::now(), phase_power) {
            debug!(
                consumption = %flow.consumption,
                feed_in = %flow.feed_in,
                net_usage = %flow.net_usage,
                "recorded",
            );
            // Awaited, so that the saves never overlap, while the server keeps running.
            if let Some(save) = self.monitor.save_job()
                && let Err(error) = spawn_blocking(save).await
            {
                error!("the save task has failed: {error:#}");
            }
        }
        self.sender.send_replace(Arc::new(self.monitor.snapshot()));
    }
}
