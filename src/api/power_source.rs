use async_trait::async_trait;

use crate::{prelude::*, quantity::power::Watts};

pub const N_PHASES: usize = 3;

/// Instantaneous active power per phase. Negative values mean feed-in.
pub type PhasePower = [Watts; N_PHASES];

#[async_trait]
pub trait PowerSource: Send + Sync {
    async fn try_get_phase_power(&self) -> Result<PhasePower>;

    /// Degraded read: any failure reads as no activity on all phases.
    async fn get_phase_power(&self) -> PhasePower {
        self.try_get_phase_power().await.unwrap_or_else(|error| {
            warn!("failed to read the phase power, assuming zeros: {error:#}");
            [Watts::ZERO; N_PHASES]
        })
    }
}
