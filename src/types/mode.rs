use std::fmt;
use std::str::FromStr;

use crate::consts::{MODE_ACTIVE, MODE_QUERY};
use crate::error::Error;

/// Reporting mode of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// The sensor pushes a data report every working period.
	Active,
	/// The sensor only answers explicit data queries.
	Query,
}

impl Mode {
	pub fn to_byte(self) -> u8 {
		match self {
			Mode::Active => MODE_ACTIVE,
			Mode::Query => MODE_QUERY,
		}
	}

	pub fn from_byte(b: u8) -> Self {
		if b == MODE_ACTIVE {
			Mode::Active
		} else {
			Mode::Query
		}
	}
}

impl FromStr for Mode {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"active" | "0" => Ok(Mode::Active),
			"query" | "passive" | "1" => Ok(Mode::Query),
			other => Err(Error::InvalidArgument(format!(
				"unknown mode {other:?}, expected active or query"
			))),
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Mode::Active => f.write_str("active"),
			Mode::Query => f.write_str("query"),
		}
	}
}

/// Fan and laser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkState {
	Sleeping,
	Working,
}

impl WorkState {
	pub fn to_byte(self) -> u8 {
		match self {
			WorkState::Sleeping => 0,
			WorkState::Working => 1,
		}
	}

	pub fn from_byte(b: u8) -> Self {
		if b == 0 {
			WorkState::Sleeping
		} else {
			WorkState::Working
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mode_parses_names_and_wire_values() {
		assert_eq!("active".parse::<Mode>().unwrap(), Mode::Active);
		assert_eq!("Query".parse::<Mode>().unwrap(), Mode::Query);
		assert_eq!("1".parse::<Mode>().unwrap(), Mode::Query);
		assert!("sometimes".parse::<Mode>().is_err());
	}

	#[test]
	fn mode_bytes_match_protocol() {
		assert_eq!(Mode::Active.to_byte(), 0);
		assert_eq!(Mode::Query.to_byte(), 1);
		assert_eq!(Mode::from_byte(0), Mode::Active);
		assert_eq!(WorkState::from_byte(1), WorkState::Working);
	}
}
