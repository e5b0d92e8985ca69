pub mod power_source;
pub mod shelly;
