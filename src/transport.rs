use std::io;
use std::time::{Duration, Instant};

use log::debug;

use crate::consts::SERIAL_BAUD_RATE;
use crate::error::{Error, Result};

/// Byte-level access to the sensor link.
///
/// Reads are bounded by the implementation's timeout and report it as
/// [`Error::DeviceTimeout`].
pub trait Transport {
	fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

	fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

	fn read_byte(&mut self) -> Result<u8> {
		let mut b = [0u8; 1];
		self.read_exact(&mut b)?;
		Ok(b[0])
	}

	/// Drops anything already buffered on the receive side.
	fn clear_input(&mut self) -> Result<()> {
		Ok(())
	}

	/// Releases the link. Called again on drop, so it must be idempotent.
	fn close(&mut self) -> Result<()> {
		Ok(())
	}
}

impl<T: Transport + ?Sized> Transport for Box<T> {
	fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
		(**self).write_all(bytes)
	}

	fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
		(**self).read_exact(buf)
	}

	fn read_byte(&mut self) -> Result<u8> {
		(**self).read_byte()
	}

	fn clear_input(&mut self) -> Result<()> {
		(**self).clear_input()
	}

	fn close(&mut self) -> Result<()> {
		(**self).close()
	}
}

pub struct SerialTransport {
	port: Option<Box<dyn serialport::SerialPort>>,
	timeout: Duration,
}

impl SerialTransport {
	/// Opens `path` at 9600 8N1 and discards stale input.
	pub fn open(path: &str, timeout: Duration) -> Result<Self> {
		let port = serialport::new(path, SERIAL_BAUD_RATE)
			.data_bits(serialport::DataBits::Eight)
			.stop_bits(serialport::StopBits::One)
			.parity(serialport::Parity::None)
			.flow_control(serialport::FlowControl::None)
			.timeout(timeout)
			.open()?;
		debug!("opened {path} at {SERIAL_BAUD_RATE} baud, timeout {timeout:?}");

		let mut transport = SerialTransport {
			port: Some(port),
			timeout,
		};
		transport.clear_input()?;
		Ok(transport)
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	fn port(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>> {
		self.port
			.as_mut()
			.ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port closed").into())
	}
}

impl Transport for SerialTransport {
	fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
		let port = self.port()?;
		io::Write::write_all(&mut *port, bytes)?;
		io::Write::flush(&mut *port)?;
		Ok(())
	}

	fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
		let timeout = self.timeout;
		let port = self.port()?;
		let expected = buf.len();
		let mut pos = 0;
		let deadline = Instant::now().checked_add(timeout);
		while pos < expected {
			if deadline.is_some_and(|d| Instant::now() > d) {
				return Err(Error::DeviceTimeout {
					expected,
					received: pos,
				});
			}
			match io::Read::read(&mut *port, &mut buf[pos..]) {
				Ok(0) => {
					return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "serial port EOF").into())
				}
				Ok(n) => pos += n,
				Err(e) if e.kind() == io::ErrorKind::TimedOut => {
					return Err(Error::DeviceTimeout {
						expected,
						received: pos,
					});
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
				Err(e) => return Err(e.into()),
			}
		}
		Ok(())
	}

	fn clear_input(&mut self) -> Result<()> {
		self.port()?.clear(serialport::ClearBuffer::Input)?;
		Ok(())
	}

	fn close(&mut self) -> Result<()> {
		if self.port.take().is_some() {
			debug!("serial port closed");
		}
		Ok(())
	}
}
