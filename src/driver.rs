use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::DriverConfig;
use crate::consts::{DRIVER_VERSION, MIN_POLL_INTERVAL};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{LoopRecord, Reading};

// Longest uninterrupted sleep while waiting out the poll interval.
const SHUTDOWN_SLICE: Duration = Duration::from_secs(1);

pub trait Sleeper {
	fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
	fn sleep(&mut self, duration: Duration) {
		std::thread::sleep(duration);
	}
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
	fn sleep(&mut self, duration: Duration) {
		(**self).sleep(duration);
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
	Idle,
	Polling,
	Retrying,
	Failed,
}

/// Cooperative stop flag, checked between ticks.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
	pub fn request(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_requested(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

/// Turns a fallible read into an endless stream of records.
///
/// Each call to `next` is one tick: wait `poll_interval` (except before the
/// first tick), then try `read` up to `max_tries` times with `retry_wait`
/// between failures. Once the budget is exhausted the poller yields
/// [`Error::MaxRetriesExceeded`] and ends; it is not restartable.
pub struct Poller<F, S = ThreadSleeper> {
	read: F,
	sleeper: S,
	config: DriverConfig,
	state: DriverState,
	ticks: u64,
	shutdown: ShutdownHandle,
}

impl<F> Poller<F>
where
	F: FnMut() -> Result<Reading>,
{
	pub fn new(config: DriverConfig, read: F) -> Self {
		Self::with_sleeper(config, read, ThreadSleeper)
	}
}

impl<F, S> Poller<F, S>
where
	F: FnMut() -> Result<Reading>,
	S: Sleeper,
{
	pub fn with_sleeper(config: DriverConfig, read: F, sleeper: S) -> Self {
		info!("driver version is {DRIVER_VERSION}");
		info!("model is {}", config.model());
		info!("port is {}", config.port());
		info!("poll interval is {}", config.poll_interval_secs());
		if config.poll_interval_secs() < MIN_POLL_INTERVAL {
			warn!(
				"poll interval below {MIN_POLL_INTERVAL}s, the sensor may return bogus data"
			);
		}
		Poller {
			read,
			sleeper,
			config,
			state: DriverState::Idle,
			ticks: 0,
			shutdown: ShutdownHandle::default(),
		}
	}

	pub fn state(&self) -> DriverState {
		self.state
	}

	pub fn config(&self) -> &DriverConfig {
		&self.config
	}

	pub fn hardware_name(&self) -> &str {
		self.config.model()
	}

	pub fn shutdown_handle(&self) -> ShutdownHandle {
		self.shutdown.clone()
	}

	/// Runs one tick's worth of attempts. Every failure that ends the tick,
	/// retried or not, comes back as [`Error::MaxRetriesExceeded`].
	pub fn poll_once(&mut self) -> Result<Reading> {
		let max_tries = self.config.max_tries();
		let mut attempt = 1;
		self.state = DriverState::Polling;
		loop {
			match (self.read)() {
				Ok(reading) => {
					self.state = DriverState::Idle;
					return Ok(reading);
				}
				Err(e) if !e.is_transient() => {
					error!("giving up on non-recoverable error: {e}");
					self.state = DriverState::Failed;
					return Err(Error::MaxRetriesExceeded {
						tries: attempt,
						last: Box::new(e),
					});
				}
				Err(e) => {
					info!("failed attempt {attempt} of {max_tries}: {e}");
					if attempt >= max_tries {
						error!("max tries {max_tries} exceeded");
						self.state = DriverState::Failed;
						return Err(Error::MaxRetriesExceeded {
							tries: max_tries,
							last: Box::new(e),
						});
					}
					self.state = DriverState::Retrying;
					self.sleeper.sleep(self.config.retry_wait());
					attempt += 1;
				}
			}
		}
	}

	pub fn close(self) {
		debug!("poller closed after {} tick(s)", self.ticks);
	}

	// false when shutdown was requested during the wait
	fn wait_interval(&mut self) -> bool {
		let mut remaining = self.config.poll_interval();
		while !remaining.is_zero() {
			if self.shutdown.is_requested() {
				return false;
			}
			let slice = remaining.min(SHUTDOWN_SLICE);
			self.sleeper.sleep(slice);
			remaining -= slice;
		}
		!self.shutdown.is_requested()
	}
}

impl<F, S> Iterator for Poller<F, S>
where
	F: FnMut() -> Result<Reading>,
	S: Sleeper,
{
	type Item = Result<LoopRecord>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.state == DriverState::Failed || self.shutdown.is_requested() {
			return None;
		}
		if self.ticks > 0 && !self.wait_interval() {
			return None;
		}
		let result = self.poll_once().map(|reading| {
			debug!("data: {} {}", reading.pm2_5(), reading.pm10_0());
			LoopRecord::from_reading(&reading)
		});
		self.ticks += 1;
		Some(result)
	}
}

/// Polls `device` with `query_data`. The device, and with it the transport,
/// lives as long as the poller.
pub fn poll_device<T: Transport>(
	config: DriverConfig,
	mut device: Device<T>,
) -> Poller<impl FnMut() -> Result<Reading>> {
	Poller::new(config, move || device.query_data())
}

/// Opens the configured serial port and starts polling it.
pub fn open(config: DriverConfig) -> Result<Poller<impl FnMut() -> Result<Reading>>> {
	let device = Device::open(config.port(), config.timeout())?.strict(config.strict());
	Ok(poll_device(config, device))
}
