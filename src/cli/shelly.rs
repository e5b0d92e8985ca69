use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::{api::shelly, prelude::*};

#[derive(Parser)]
pub struct ShellyArgs {
    #[clap(
        long = "shelly-cloud-url",
        env = "SHELLY_CLOUD_URL",
        default_value = "https://shelly-49-eu.shelly.cloud"
    )]
    base_url: Url,

    #[clap(long = "shelly-auth-key", env = "SHELLY_AUTH_KEY", hide_env_values = true)]
    auth_key: String,

    #[clap(long = "shelly-device-id", env = "SHELLY_DEVICE_ID")]
    device_id: String,

    /// Upper bound on a single device status request.
    #[clap(long, env = "FETCH_TIMEOUT", default_value = "5s")]
    fetch_timeout: humantime::Duration,
}

impl ShellyArgs {
    pub fn client(&self) -> Result<shelly::Client> {
        shelly::Client::new(
            &self.base_url,
            &self.auth_key,
            &self.device_id,
            Duration::from(self.fetch_timeout),
        )
    }
}
