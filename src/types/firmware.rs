use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
	pub year: u8,
	pub month: u8,
	pub day: u8,
	pub device_id: u16,
}

impl fmt::Display for FirmwareVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"20{:02}-{:02}-{:02} {:#x}",
			self.year, self.month, self.day, self.device_id
		)
	}
}
