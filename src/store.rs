mod columns;
mod log;
mod storage;

pub use self::{
    log::{SampleLog, StatisticsLog},
    storage::Storage,
};
use crate::{
    core::{flow::PowerFlow, point::Point, totals::EnergyTotals},
    quantity::energy::KilowattHours,
};

/// One recorded tick of the power flow.
pub type Sample = Point<PowerFlow>;

/// Running totals as of one recorded tick.
pub type TotalsSnapshot = Point<EnergyTotals<KilowattHours>>;
