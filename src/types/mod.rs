mod firmware;
mod mode;
mod reading;
pub mod units;

pub use firmware::FirmwareVersion;
pub use mode::{Mode, WorkState};
pub use reading::{LoopRecord, Reading, SCHEMA};
pub use units::UnitGroup;
