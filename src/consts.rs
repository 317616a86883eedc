use std::time::Duration;

pub const HEAD: u8 = 0xAA;
pub const COMMAND_ID: u8 = 0xB4;
pub const REPLY_ID: u8 = 0xC5;
pub const DATA_REPORT_ID: u8 = 0xC0;
pub const TAIL: u8 = 0xAB;

pub const COMMAND_FRAME_SIZE: usize = 19;
pub const COMMAND_DATA_SIZE: usize = 12;
pub const RESPONSE_FRAME_SIZE: usize = 10;

// Broadcast address, every sensor answers to it.
pub const BROADCAST_ID: [u8; 2] = [0xFF, 0xFF];

pub const CMD_SET_MODE: u8 = 2;
pub const CMD_QUERY_DATA: u8 = 4;
pub const CMD_DEVICE_ID: u8 = 5;
pub const CMD_SLEEP: u8 = 6;
pub const CMD_FIRMWARE: u8 = 7;
pub const CMD_WORKING_PERIOD: u8 = 8;

pub const MODE_ACTIVE: u8 = 0;
pub const MODE_QUERY: u8 = 1;

pub const ACTION_QUERY: u8 = 0;
pub const ACTION_SET: u8 = 1;

pub const MAX_WORKING_PERIOD: u8 = 30;

// Upper bound on bytes discarded while hunting for HEAD.
pub const SYNC_SCAN_LIMIT: usize = 1024;

pub const SERIAL_BAUD_RATE: u32 = 9600;
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_MODEL: &str = "NovaPM";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);
pub const DEFAULT_POLL_INTERVAL: u64 = 30;
pub const MIN_POLL_INTERVAL: u64 = 10;
pub const DEFAULT_MAX_TRIES: u32 = 3;
pub const DEFAULT_RETRY_WAIT: u64 = 5;

// weewx METRICWX unit system tag.
pub const METRICWX: u8 = 0x11;

pub const DRIVER_NAME: &str = "SDS011";
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");
