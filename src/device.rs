use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{debug, warn};

use crate::consts::*;
use crate::error::{Error, ProtocolError, Result};
use crate::protocol::commands::*;
use crate::protocol::frame::Command;
use crate::transport::{SerialTransport, Transport};
use crate::types::{FirmwareVersion, Mode, Reading, WorkState};

/// A session with one sensor. Owns the transport; every operation is a
/// single command/response round trip with no retries.
pub struct Device<T: Transport> {
	transport: T,
	timeout: Duration,
	strict: bool,
}

impl Device<SerialTransport> {
	pub fn open(path: &str, timeout: Duration) -> Result<Self> {
		let transport = SerialTransport::open(path, timeout)?;
		Ok(Device::new(transport, timeout))
	}
}

impl<T: Transport> Device<T> {
	pub fn new(transport: T, timeout: Duration) -> Self {
		Device {
			transport,
			timeout,
			strict: false,
		}
	}

	/// In strict mode bad checksums, bad tails and mismatched replies are
	/// protocol errors instead of warnings.
	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	pub fn is_strict(&self) -> bool {
		self.strict
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	pub fn query_data(&mut self) -> Result<Reading> {
		let raw = self.command(&build_query_data()?)?;
		let resp = decode_data_response(&raw)?;
		let resp = if self.strict {
			if resp.report_id != DATA_REPORT_ID {
				return Err(ProtocolError::UnexpectedReply {
					opcode: CMD_QUERY_DATA,
					frame: raw.to_vec(),
				}
				.into());
			}
			resp.verify()?
		} else {
			if let ChecksumStatus::Mismatch { computed, received } = resp.checksum {
				warn!("ignoring checksum mismatch: computed {computed:#04x}, received {received:#04x}");
			}
			if resp.tail != TAIL {
				debug!("unexpected frame tail {:#04x}", resp.tail);
			}
			resp
		};
		debug!("data: pm2_5={} pm10_0={}", resp.pm2_5, resp.pm10_0);
		Ok(Reading::new(resp.pm2_5, resp.pm10_0, now_timestamp()))
	}

	pub fn firmware(&mut self) -> Result<FirmwareVersion> {
		let raw = self.command(&build_firmware()?)?;
		self.check_reply(&raw, Command::Firmware)?;
		decode_firmware_response(&raw)
	}

	pub fn get_firmware_version(&mut self) -> Result<String> {
		Ok(self.firmware()?.to_string())
	}

	pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
		debug!("set mode to {mode}");
		let raw = self.command(&build_set_mode(mode)?)?;
		self.check_reply(&raw, Command::SetMode)
	}

	pub fn get_mode(&mut self) -> Result<Mode> {
		let raw = self.command(&build_get_mode()?)?;
		Ok(Mode::from_byte(reply_value(&raw, Command::SetMode)?))
	}

	/// `true` puts the sensor to sleep, `false` wakes it up.
	pub fn set_sleep(&mut self, sleep: bool) -> Result<()> {
		debug!("set sleep to {sleep}");
		let raw = self.command(&build_set_sleep(sleep)?)?;
		self.check_reply(&raw, Command::Sleep)
	}

	pub fn get_sleep(&mut self) -> Result<WorkState> {
		let raw = self.command(&build_get_sleep()?)?;
		Ok(WorkState::from_byte(reply_value(&raw, Command::Sleep)?))
	}

	pub fn wake(&mut self) -> Result<()> {
		self.set_sleep(false)
	}

	pub fn sleep(&mut self) -> Result<()> {
		self.set_sleep(true)
	}

	/// Sets the duty cycle: 0 is continuous, 1-30 reports once every N minutes.
	///
	/// The unit is minutes, as the sensor counts it, not the seconds used by
	/// the poll interval. Values above 30 fail with
	/// [`Error::InvalidArgument`] before anything is written.
	pub fn set_working_period(&mut self, minutes: u8) -> Result<()> {
		debug!("set working period to {minutes}");
		let raw = self.command(&build_set_working_period(minutes)?)?;
		self.check_reply(&raw, Command::WorkingPeriod)
	}

	pub fn get_working_period(&mut self) -> Result<u8> {
		let raw = self.command(&build_get_working_period()?)?;
		reply_value(&raw, Command::WorkingPeriod)
	}

	pub fn set_device_id(&mut self, id: u16) -> Result<()> {
		debug!("set device id to {id:#06x}");
		let raw = self.command(&build_set_device_id(id)?)?;
		self.check_reply(&raw, Command::DeviceId)
	}

	pub fn close(mut self) -> Result<()> {
		self.transport.close()
	}

	fn command(&mut self, frame: &CommandFrame) -> Result<[u8; RESPONSE_FRAME_SIZE]> {
		debug!("write: {}", hex(frame));
		self.transport.write_all(frame)?;
		self.read_response()
	}

	/// Discards bytes until HEAD, then reads the remaining nine bytes of the
	/// response in one go.
	fn read_response(&mut self) -> Result<[u8; RESPONSE_FRAME_SIZE]> {
		// None when the timeout is too large to represent; the scan limit still applies.
		let deadline = Instant::now().checked_add(self.timeout);
		let mut discarded = 0;
		loop {
			if discarded >= SYNC_SCAN_LIMIT {
				return Err(ProtocolError::SyncLost { scanned: discarded }.into());
			}
			if deadline.is_some_and(|d| Instant::now() > d) {
				return Err(Error::DeviceTimeout {
					expected: RESPONSE_FRAME_SIZE,
					received: 0,
				});
			}
			let b = self.transport.read_byte().map_err(|e| match e {
				Error::DeviceTimeout { .. } => Error::DeviceTimeout {
					expected: RESPONSE_FRAME_SIZE,
					received: 0,
				},
				e => e,
			})?;
			if b == HEAD {
				break;
			}
			discarded += 1;
		}
		if discarded > 0 {
			debug!("discarded {discarded} byte(s) before frame header");
		}

		let mut raw = [0u8; RESPONSE_FRAME_SIZE];
		raw[0] = HEAD;
		self.transport
			.read_exact(&mut raw[1..])
			.map_err(|e| match e {
				Error::DeviceTimeout { received, .. } => Error::DeviceTimeout {
					expected: RESPONSE_FRAME_SIZE,
					received: received + 1,
				},
				e => e,
			})?;
		debug!("read: {}", hex(&raw));
		Ok(raw)
	}

	fn check_reply(&self, raw: &[u8; RESPONSE_FRAME_SIZE], cmd: Command) -> Result<()> {
		if is_reply_to(raw, cmd) {
			return Ok(());
		}
		if self.strict {
			return Err(ProtocolError::UnexpectedReply {
				opcode: cmd.opcode(),
				frame: raw.to_vec(),
			}
			.into());
		}
		warn!("unexpected reply to {cmd:?}: {}", hex(raw));
		Ok(())
	}
}

impl<T: Transport> Drop for Device<T> {
	fn drop(&mut self) {
		if let Err(e) = self.transport.close() {
			warn!("closing transport: {e}");
		}
	}
}

/// Wall clock in Unix seconds, rounded to the nearest second.
pub fn now_timestamp() -> i64 {
	let now = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default();
	((now.as_millis() + 500) / 1000) as i64
}

fn hex(bytes: &[u8]) -> String {
	bytes
		.iter()
		.map(|b| format!("{b:02X}"))
		.collect::<Vec<_>>()
		.join(" ")
}
