use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Url};
use serde::Deserialize;

use crate::{
    api::power_source::{N_PHASES, PhasePower, PowerSource},
    prelude::*,
    quantity::power::Watts,
};

/// Shelly Cloud client bound to a single 3EM device.
pub struct Client {
    inner: HttpClient,
    url: Url,
}

impl Client {
    #[instrument(skip_all, fields(base_url = %base_url, device_id = device_id))]
    pub fn new(base_url: &Url, auth_key: &str, device_id: &str, timeout: Duration) -> Result<Self> {
        let inner = HttpClient::builder().user_agent("shelly-dashboard").timeout(timeout).build()?;
        Ok(Self { inner, url: Self::status_url(base_url, auth_key, device_id)? })
    }

    fn status_url(base_url: &Url, auth_key: &str, device_id: &str) -> Result<Url> {
        let mut url = base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL: `{base_url}`"))?
            .pop_if_empty()
            .push("device")
            .push("status");
        url.query_pairs_mut().append_pair("auth_key", auth_key).append_pair("id", device_id);
        Ok(url)
    }
}

#[async_trait]
impl PowerSource for Client {
    /// The URL carries the auth key, so it is stripped from every error.
    #[instrument(skip_all, level = Level::DEBUG)]
    async fn try_get_phase_power(&self) -> Result<PhasePower> {
        let response: StatusResponse = self
            .inner
            .get(self.url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("failed to request the device status")?
            .error_for_status()
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("failed to deserialize the device status")?;
        let phase_power = response.phase_power()?;
        debug!(?phase_power, "fetched");
        Ok(phase_power)
    }
}

#[derive(Deserialize)]
struct StatusResponse {
    data: StatusData,
}

#[derive(Deserialize)]
struct StatusData {
    device_status: DeviceStatus,
}

#[derive(Deserialize)]
struct DeviceStatus {
    emeters: Vec<Emeter>,
}

#[derive(Deserialize)]
struct Emeter {
    power: Watts,
}

impl StatusResponse {
    fn phase_power(self) -> Result<PhasePower> {
        let emeters = self.data.device_status.emeters;
        let n_emeters = emeters.len();
        emeters
            .into_iter()
            .map(|emeter| emeter.power)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| anyhow!("expected {N_PHASES} energy meters, got {n_emeters}"))
    }
}
