use serde::Serialize;

use crate::consts::METRICWX;

/// One decoded concentration sample, in µg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
	pm2_5: f64,
	pm10_0: f64,
	timestamp: i64,
}

impl Reading {
	pub fn new(pm2_5: f64, pm10_0: f64, timestamp: i64) -> Self {
		Self {
			pm2_5,
			pm10_0,
			timestamp,
		}
	}

	pub fn pm2_5(&self) -> f64 {
		self.pm2_5
	}

	pub fn pm10_0(&self) -> f64 {
		self.pm10_0
	}

	/// Unix seconds at which the sample was decoded.
	pub fn timestamp(&self) -> i64 {
		self.timestamp
	}
}

/// Record handed to the host pipeline, one per successful tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopRecord {
	#[serde(rename = "dateTime")]
	pub date_time: i64,
	#[serde(rename = "usUnits")]
	pub us_units: u8,
	pub pm2_5: f64,
	pub pm10_0: f64,
}

impl LoopRecord {
	pub fn from_reading(reading: &Reading) -> Self {
		Self {
			date_time: reading.timestamp(),
			us_units: METRICWX,
			pm2_5: reading.pm2_5(),
			pm10_0: reading.pm10_0(),
		}
	}
}

/// Archive table layout for stored records. `interval` is filled in by the
/// archiver, not by the driver.
pub const SCHEMA: &[(&str, &str)] = &[
	("dateTime", "INTEGER NOT NULL PRIMARY KEY"),
	("usUnits", "INTEGER NOT NULL"),
	("interval", "INTEGER NOT NULL"),
	("pm2_5", "REAL"),
	("pm10_0", "REAL"),
];
