#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use sds011::consts::{DATA_REPORT_ID, HEAD, REPLY_ID, TAIL};
use sds011::protocol::checksum;
use sds011::{Error, Result, Sleeper, Transport};

#[derive(Default)]
struct Inner {
	rx: VecDeque<u8>,
	replies: VecDeque<Vec<u8>>,
	written: Vec<Vec<u8>>,
	closed: usize,
}

/// In-memory link. Each write releases the next queued reply into the
/// receive buffer; reading past the buffer times out.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
	inner: Rc<RefCell<Inner>>,
}

impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_rx(&self, bytes: &[u8]) {
		self.inner.borrow_mut().rx.extend(bytes);
	}

	pub fn reply_with(&self, bytes: Vec<u8>) {
		self.inner.borrow_mut().replies.push_back(bytes);
	}

	pub fn stay_silent(&self) {
		self.reply_with(Vec::new());
	}

	pub fn written(&self) -> Vec<Vec<u8>> {
		self.inner.borrow().written.clone()
	}

	pub fn close_count(&self) -> usize {
		self.inner.borrow().closed
	}
}

impl Transport for ScriptedTransport {
	fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
		let mut inner = self.inner.borrow_mut();
		inner.written.push(bytes.to_vec());
		if let Some(reply) = inner.replies.pop_front() {
			inner.rx.extend(reply);
		}
		Ok(())
	}

	fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
		let mut inner = self.inner.borrow_mut();
		if inner.rx.len() < buf.len() {
			let received = inner.rx.len();
			inner.rx.clear();
			return Err(Error::DeviceTimeout {
				expected: buf.len(),
				received,
			});
		}
		for b in buf.iter_mut() {
			*b = inner.rx.pop_front().unwrap_or_default();
		}
		Ok(())
	}

	fn close(&mut self) -> Result<()> {
		self.inner.borrow_mut().closed += 1;
		Ok(())
	}
}

/// Link that answers every read with header-free noise, one byte per `delay`.
pub struct TricklingTransport {
	pub delay: Duration,
	pub sent: usize,
}

impl TricklingTransport {
	pub fn new(delay: Duration) -> Self {
		Self { delay, sent: 0 }
	}
}

impl Transport for TricklingTransport {
	fn write_all(&mut self, _bytes: &[u8]) -> Result<()> {
		Ok(())
	}

	fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
		for b in buf.iter_mut() {
			std::thread::sleep(self.delay);
			*b = 0x55;
			self.sent += 1;
		}
		Ok(())
	}
}

#[derive(Default)]
pub struct RecordingSleeper {
	pub calls: Vec<Duration>,
}

impl RecordingSleeper {
	pub fn total(&self) -> Duration {
		self.calls.iter().sum()
	}
}

impl Sleeper for RecordingSleeper {
	fn sleep(&mut self, duration: Duration) {
		self.calls.push(duration);
	}
}

/// Data report for the given raw tenths-of-µg/m³ values, checksum filled in.
pub fn data_frame(pm2_5: u16, pm10: u16) -> Vec<u8> {
	let mut raw = vec![HEAD, DATA_REPORT_ID, 0, 0, 0, 0, 0xA1, 0x60, 0, TAIL];
	raw[2..4].copy_from_slice(&pm2_5.to_le_bytes());
	raw[4..6].copy_from_slice(&pm10.to_le_bytes());
	raw[8] = checksum(&raw[2..8]);
	raw
}

pub fn reply_frame(opcode: u8, action: u8, value: u8) -> Vec<u8> {
	let mut raw = vec![HEAD, REPLY_ID, opcode, action, value, 0, 0xA1, 0x60, 0, TAIL];
	raw[8] = checksum(&raw[2..8]);
	raw
}

/// Noise that never contains the frame header.
pub fn garbage(n: usize) -> Vec<u8> {
	(0..n)
		.map(|i| match (i * 37 % 256) as u8 {
			HEAD => 0x55,
			b => b,
		})
		.collect()
}
