use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use sds011::Mode;

#[derive(Parser)]
#[command(name = "sds011", about = "Diagnostic tool for the SDS011 particulate sensor")]
pub struct Cli {
	#[arg(long, help = "Serial port to which the sensor is connected")]
	pub port: Option<String>,

	#[arg(long, help = "Serial timeout, in seconds")]
	pub timeout: Option<f64>,

	#[arg(long, help = "How often to poll for data, in seconds")]
	pub poll_interval: Option<u64>,

	#[arg(long, help = "Read driver settings from a TOML file")]
	pub config: Option<PathBuf>,

	#[arg(long, help = "Treat checksum and reply mismatches as errors")]
	pub strict: bool,

	#[arg(long, help = "Display diagnostic information while running")]
	pub debug: bool,

	#[arg(long, help = "Display driver version")]
	pub version: bool,

	#[arg(long, help = "Display firmware version and exit")]
	pub info: bool,

	#[arg(long = "set-id", value_name = "ID", help = "Set device identifier")]
	pub device_id: Option<u16>,

	#[arg(long = "set-mode", value_name = "MODE", help = "Set the reporting mode")]
	pub device_mode: Option<ModeArg>,

	#[arg(long = "set-sleep", value_name = "SLEEP", help = "Put the sensor to sleep (true) or wake it (false)")]
	pub sleep: Option<bool>,

	#[arg(long = "set-work", value_name = "MINUTES", help = "Set working period, 0-30 minutes")]
	pub work: Option<u8>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
	Active,
	Query,
}

impl From<ModeArg> for Mode {
	fn from(m: ModeArg) -> Self {
		match m {
			ModeArg::Active => Mode::Active,
			ModeArg::Query => Mode::Query,
		}
	}
}
