use crate::consts::*;
use crate::error::{Error, ProtocolError, Result};
use crate::protocol::frame::{checksum, encode_command, Command};
use crate::types::{FirmwareVersion, Mode, WorkState};

pub type CommandFrame = [u8; COMMAND_FRAME_SIZE];

pub fn build_query_data() -> Result<CommandFrame> {
	encode_command(Command::QueryData, &[])
}

pub fn build_firmware() -> Result<CommandFrame> {
	encode_command(Command::Firmware, &[])
}

pub fn build_set_mode(mode: Mode) -> Result<CommandFrame> {
	encode_command(Command::SetMode, &[ACTION_SET, mode.to_byte()])
}

pub fn build_get_mode() -> Result<CommandFrame> {
	encode_command(Command::SetMode, &[ACTION_QUERY])
}

pub fn build_set_sleep(sleep: bool) -> Result<CommandFrame> {
	let state = if sleep {
		WorkState::Sleeping
	} else {
		WorkState::Working
	};
	encode_command(Command::Sleep, &[ACTION_SET, state.to_byte()])
}

pub fn build_get_sleep() -> Result<CommandFrame> {
	encode_command(Command::Sleep, &[ACTION_QUERY])
}

pub fn build_set_working_period(minutes: u8) -> Result<CommandFrame> {
	if minutes > MAX_WORKING_PERIOD {
		return Err(Error::InvalidArgument(format!(
			"working period must be 0-{MAX_WORKING_PERIOD} minutes, got {minutes}"
		)));
	}
	encode_command(Command::WorkingPeriod, &[ACTION_SET, minutes])
}

pub fn build_get_working_period() -> Result<CommandFrame> {
	encode_command(Command::WorkingPeriod, &[ACTION_QUERY])
}

pub fn build_set_device_id(id: u16) -> Result<CommandFrame> {
	let mut data = [0u8; COMMAND_DATA_SIZE];
	data[10..12].copy_from_slice(&id.to_le_bytes());
	encode_command(Command::DeviceId, &data)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumStatus {
	Valid,
	Mismatch { computed: u8, received: u8 },
}

impl ChecksumStatus {
	/// Checks bytes 2..=7 of a 10-byte response against byte 8.
	pub fn of(raw: &[u8; RESPONSE_FRAME_SIZE]) -> Self {
		let computed = checksum(&raw[2..8]);
		if computed == raw[8] {
			ChecksumStatus::Valid
		} else {
			ChecksumStatus::Mismatch {
				computed,
				received: raw[8],
			}
		}
	}

	pub fn is_valid(&self) -> bool {
		matches!(self, ChecksumStatus::Valid)
	}
}

/// A decoded data response. Checksum and tail problems are reported, not
/// enforced; call [`DataResponse::verify`] to turn them into errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataResponse {
	pub report_id: u8,
	pub pm2_5: f64,
	pub pm10_0: f64,
	pub device_id: u16,
	pub checksum: ChecksumStatus,
	pub tail: u8,
}

impl DataResponse {
	pub fn verify(self) -> Result<Self> {
		if let ChecksumStatus::Mismatch { computed, received } = self.checksum {
			return Err(ProtocolError::BadChecksum { computed, received }.into());
		}
		if self.tail != TAIL {
			return Err(ProtocolError::BadTail(self.tail).into());
		}
		Ok(self)
	}
}

fn response_frame(raw: &[u8]) -> Result<&[u8; RESPONSE_FRAME_SIZE]> {
	let frame: &[u8; RESPONSE_FRAME_SIZE] = raw
		.get(..RESPONSE_FRAME_SIZE)
		.and_then(|s| s.try_into().ok())
		.ok_or(ProtocolError::TooShort {
			expected: RESPONSE_FRAME_SIZE,
			actual: raw.len(),
		})?;
	if frame[0] != HEAD {
		return Err(ProtocolError::BadHeader(frame[0]).into());
	}
	Ok(frame)
}

/// Decodes `AA <id> <pm2.5 LE> <pm10 LE> <device id> <checksum> AB`.
/// Concentrations arrive in tenths of µg/m³.
pub fn decode_data_response(raw: &[u8]) -> Result<DataResponse> {
	let frame = response_frame(raw)?;
	Ok(DataResponse {
		report_id: frame[1],
		pm2_5: u16::from_le_bytes([frame[2], frame[3]]) as f64 / 10.0,
		pm10_0: u16::from_le_bytes([frame[4], frame[5]]) as f64 / 10.0,
		device_id: u16::from_le_bytes([frame[6], frame[7]]),
		checksum: ChecksumStatus::of(frame),
		tail: frame[9],
	})
}

pub fn decode_firmware_response(raw: &[u8]) -> Result<FirmwareVersion> {
	let frame = response_frame(raw)?;
	Ok(FirmwareVersion {
		year: frame[3],
		month: frame[4],
		day: frame[5],
		device_id: u16::from_le_bytes([frame[6], frame[7]]),
	})
}

/// Whether `raw` acknowledges `cmd`. A data report is also accepted: in
/// active mode the sensor may push one before the reply.
pub fn is_reply_to(raw: &[u8; RESPONSE_FRAME_SIZE], cmd: Command) -> bool {
	(raw[1] == REPLY_ID && raw[2] == cmd.opcode()) || raw[1] == DATA_REPORT_ID
}

/// Value byte of a query/set reply: `AA C5 <opcode> <action> <value> ...`.
pub fn reply_value(raw: &[u8; RESPONSE_FRAME_SIZE], cmd: Command) -> Result<u8> {
	if raw[1] != REPLY_ID || raw[2] != cmd.opcode() {
		return Err(ProtocolError::UnexpectedReply {
			opcode: cmd.opcode(),
			frame: raw.to_vec(),
		}
		.into());
	}
	Ok(raw[4])
}
