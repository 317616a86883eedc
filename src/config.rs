use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::consts::*;
use crate::error::{Error, Result};

pub const DEFAULT_STANZA: &str = r#"
[SDS011]
    # This section is for SDS011 particulate sensors.

    model = "NovaPM"

    port = "/dev/ttyUSB0"

    # How often to poll the device, in seconds (do not set lower than 10)
    poll_interval = 10
"#;

/// Validated driver settings. Built once through [`DriverConfigBuilder`] and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
	port: String,
	timeout: Duration,
	poll_interval: u64,
	max_tries: u32,
	retry_wait: u64,
	model: String,
	strict: bool,
}

impl DriverConfig {
	pub fn builder() -> DriverConfigBuilder {
		DriverConfigBuilder::default()
	}

	/// Parses either a bare table or one nested under `[SDS011]`.
	pub fn from_toml_str(s: &str) -> Result<Self> {
		DriverConfigBuilder::from_toml_str(s)?.build()
	}

	pub fn load(path: &Path) -> Result<Self> {
		DriverConfigBuilder::load(path)?.build()
	}

	pub fn port(&self) -> &str {
		&self.port
	}

	pub fn baud_rate(&self) -> u32 {
		SERIAL_BAUD_RATE
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_secs(self.poll_interval)
	}

	pub fn poll_interval_secs(&self) -> u64 {
		self.poll_interval
	}

	pub fn max_tries(&self) -> u32 {
		self.max_tries
	}

	pub fn retry_wait(&self) -> Duration {
		Duration::from_secs(self.retry_wait)
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn strict(&self) -> bool {
		self.strict
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfigBuilder {
	#[serde(default = "default_port")]
	pub port: String,
	/// Seconds.
	#[serde(default = "default_timeout")]
	pub timeout: f64,
	#[serde(default = "default_poll_interval")]
	pub poll_interval: u64,
	#[serde(default = "default_max_tries")]
	pub max_tries: u32,
	#[serde(default = "default_retry_wait")]
	pub retry_wait: u64,
	#[serde(default = "default_model")]
	pub model: String,
	#[serde(default)]
	pub strict: bool,
}

fn default_port() -> String {
	DEFAULT_PORT.to_string()
}

fn default_timeout() -> f64 {
	DEFAULT_TIMEOUT.as_secs_f64()
}

fn default_poll_interval() -> u64 {
	DEFAULT_POLL_INTERVAL
}

fn default_max_tries() -> u32 {
	DEFAULT_MAX_TRIES
}

fn default_retry_wait() -> u64 {
	DEFAULT_RETRY_WAIT
}

fn default_model() -> String {
	DEFAULT_MODEL.to_string()
}

impl Default for DriverConfigBuilder {
	fn default() -> Self {
		Self {
			port: default_port(),
			timeout: default_timeout(),
			poll_interval: default_poll_interval(),
			max_tries: default_max_tries(),
			retry_wait: default_retry_wait(),
			model: default_model(),
			strict: false,
		}
	}
}

impl DriverConfigBuilder {
	pub fn from_toml_str(s: &str) -> Result<Self> {
		let table: toml::Table = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
		match table.get(DRIVER_NAME) {
			Some(section) => section.clone().try_into::<DriverConfigBuilder>(),
			None => toml::Value::Table(table).try_into::<DriverConfigBuilder>(),
		}
		.map_err(|e| Error::Config(e.to_string()))
	}

	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path)
			.map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
		Self::from_toml_str(&text)
	}

	pub fn port(mut self, port: impl Into<String>) -> Self {
		self.port = port.into();
		self
	}

	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout.as_secs_f64();
		self
	}

	/// Unchecked seconds, validated by [`build`](Self::build).
	pub fn timeout_secs(mut self, secs: f64) -> Self {
		self.timeout = secs;
		self
	}

	pub fn poll_interval(mut self, secs: u64) -> Self {
		self.poll_interval = secs;
		self
	}

	pub fn max_tries(mut self, tries: u32) -> Self {
		self.max_tries = tries;
		self
	}

	pub fn retry_wait(mut self, secs: u64) -> Self {
		self.retry_wait = secs;
		self
	}

	pub fn model(mut self, model: impl Into<String>) -> Self {
		self.model = model.into();
		self
	}

	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	pub fn build(self) -> Result<DriverConfig> {
		if self.port.trim().is_empty() {
			return Err(Error::Config("port must not be empty".into()));
		}
		let timeout = Duration::try_from_secs_f64(self.timeout)
			.ok()
			.filter(|t| !t.is_zero() && *t <= MAX_TIMEOUT)
			.ok_or_else(|| {
				Error::Config(format!(
					"timeout must be between 0 and {} seconds, got {}",
					MAX_TIMEOUT.as_secs(),
					self.timeout
				))
			})?;
		if self.max_tries == 0 {
			return Err(Error::Config("max_tries must be at least 1".into()));
		}
		Ok(DriverConfig {
			port: self.port,
			timeout,
			poll_interval: self.poll_interval,
			max_tries: self.max_tries,
			retry_wait: self.retry_wait,
			model: self.model,
			strict: self.strict,
		})
	}
}
