use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between the serial port and a reading.
#[derive(Error, Debug)]
pub enum Error {
	#[error("device i/o error: {0}")]
	DeviceIo(#[from] io::Error),

	#[error("device timeout ({received}/{expected} bytes received)")]
	DeviceTimeout { expected: usize, received: usize },

	#[error(transparent)]
	Protocol(#[from] ProtocolError),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("max tries {tries} exceeded: {last}")]
	MaxRetriesExceeded { tries: u32, last: Box<Error> },
}

impl Error {
	/// Whether another attempt at the same operation could succeed.
	///
	/// Port, timeout and framing problems are transient; bad arguments,
	/// bad configuration and an exhausted retry budget are not.
	pub fn is_transient(&self) -> bool {
		matches!(
			self,
			Error::DeviceIo(_) | Error::DeviceTimeout { .. } | Error::Protocol(_)
		)
	}

	pub fn is_timeout(&self) -> bool {
		match self {
			Error::DeviceTimeout { .. } => true,
			Error::DeviceIo(e) => e.kind() == io::ErrorKind::TimedOut,
			_ => false,
		}
	}
}

impl From<serialport::Error> for Error {
	fn from(e: serialport::Error) -> Self {
		Error::DeviceIo(e.into())
	}
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
	#[error("frame too short: expected {expected} bytes, got {actual}")]
	TooShort { expected: usize, actual: usize },

	#[error("bad frame header {0:#04x}")]
	BadHeader(u8),

	#[error("bad frame tail {0:#04x}")]
	BadTail(u8),

	#[error("unknown command opcode {0}")]
	UnknownCommand(u8),

	#[error("checksum mismatch: computed {computed:#04x}, received {received:#04x}")]
	BadChecksum { computed: u8, received: u8 },

	#[error("no frame header within {scanned} bytes")]
	SyncLost { scanned: usize },

	#[error("unexpected reply to command {opcode}: {frame:02x?}")]
	UnexpectedReply { opcode: u8, frame: Vec<u8> },
}
