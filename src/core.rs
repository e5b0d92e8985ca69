pub mod flow;
pub mod monitor;
pub mod point;
pub mod time_range;
pub mod totals;
