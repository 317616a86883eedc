use crate::consts::*;
use crate::error::{Error, ProtocolError, Result};

/// Command opcodes understood by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
	SetMode,
	QueryData,
	DeviceId,
	Sleep,
	Firmware,
	WorkingPeriod,
}

impl Command {
	pub const ALL: [Command; 6] = [
		Command::SetMode,
		Command::QueryData,
		Command::DeviceId,
		Command::Sleep,
		Command::Firmware,
		Command::WorkingPeriod,
	];

	pub fn opcode(self) -> u8 {
		match self {
			Command::SetMode => CMD_SET_MODE,
			Command::QueryData => CMD_QUERY_DATA,
			Command::DeviceId => CMD_DEVICE_ID,
			Command::Sleep => CMD_SLEEP,
			Command::Firmware => CMD_FIRMWARE,
			Command::WorkingPeriod => CMD_WORKING_PERIOD,
		}
	}

	pub fn from_opcode(opcode: u8) -> std::result::Result<Self, ProtocolError> {
		Command::ALL
			.into_iter()
			.find(|c| c.opcode() == opcode)
			.ok_or(ProtocolError::UnknownCommand(opcode))
	}
}

/// Byte sum modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
	bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Builds a 19-byte command frame:
/// `AA B4 <opcode> <12 data bytes> FF FF <checksum> AB`.
///
/// `data` is zero-padded to 12 bytes. The checksum is the opcode plus the
/// data bytes, modulo 256.
pub fn encode_command(cmd: Command, data: &[u8]) -> Result<[u8; COMMAND_FRAME_SIZE]> {
	if data.len() > COMMAND_DATA_SIZE {
		return Err(Error::InvalidArgument(format!(
			"command payload too large: {} > {COMMAND_DATA_SIZE}",
			data.len()
		)));
	}
	let opcode = cmd.opcode();
	let mut buf = [0u8; COMMAND_FRAME_SIZE];
	buf[0] = HEAD;
	buf[1] = COMMAND_ID;
	buf[2] = opcode;
	buf[3..3 + data.len()].copy_from_slice(data);
	buf[15..17].copy_from_slice(&BROADCAST_ID);
	buf[17] = opcode.wrapping_add(checksum(&buf[3..15]));
	buf[18] = TAIL;
	Ok(buf)
}

/// Parses a command frame back into its opcode and padded payload.
pub fn decode_command(frame: &[u8]) -> Result<(Command, [u8; COMMAND_DATA_SIZE])> {
	if frame.len() < COMMAND_FRAME_SIZE {
		return Err(ProtocolError::TooShort {
			expected: COMMAND_FRAME_SIZE,
			actual: frame.len(),
		}
		.into());
	}
	if frame[0] != HEAD {
		return Err(ProtocolError::BadHeader(frame[0]).into());
	}
	if frame[1] != COMMAND_ID {
		return Err(ProtocolError::BadHeader(frame[1]).into());
	}
	if frame[18] != TAIL {
		return Err(ProtocolError::BadTail(frame[18]).into());
	}
	let cmd = Command::from_opcode(frame[2])?;
	let computed = frame[2].wrapping_add(checksum(&frame[3..15]));
	if computed != frame[17] {
		return Err(ProtocolError::BadChecksum {
			computed,
			received: frame[17],
		}
		.into());
	}
	let mut data = [0u8; COMMAND_DATA_SIZE];
	data.copy_from_slice(&frame[3..15]);
	Ok((cmd, data))
}
