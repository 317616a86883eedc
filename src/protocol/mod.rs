pub mod commands;
pub mod frame;

pub use commands::{decode_data_response, decode_firmware_response, ChecksumStatus, DataResponse};
pub use frame::{checksum, decode_command, encode_command, Command};
