//! Driver for the Nova SDS011 particulate matter sensor.
//!
//! [`protocol`] builds and parses the sensor's fixed-size frames,
//! [`Device`] runs command/response round trips over a [`Transport`], and
//! [`Poller`] turns repeated queries into a stream of [`LoopRecord`]s with
//! bounded retries.

pub mod config;
pub mod consts;
pub mod device;
pub mod driver;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod types;

pub use config::{DriverConfig, DriverConfigBuilder};
pub use device::Device;
pub use driver::{DriverState, Poller, ShutdownHandle, Sleeper, ThreadSleeper};
pub use error::{Error, ProtocolError, Result};
pub use protocol::{decode_command, decode_data_response, decode_firmware_response, encode_command, Command};
pub use transport::{SerialTransport, Transport};
pub use types::{FirmwareVersion, LoopRecord, Mode, Reading, WorkState, SCHEMA};
