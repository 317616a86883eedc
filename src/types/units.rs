pub const GROUP_CONCENTRATION: &str = "group_concentration";
pub const MICROGRAM_PER_METER_CUBED: &str = "microgram_per_meter_cubed";

/// Unit group registration the host needs before it can label readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitGroup {
	pub group: &'static str,
	pub unit: &'static str,
	pub format: &'static str,
	pub label: &'static str,
	pub observations: &'static [&'static str],
}

pub const CONCENTRATION: UnitGroup = UnitGroup {
	group: GROUP_CONCENTRATION,
	unit: MICROGRAM_PER_METER_CUBED,
	format: "%.3f",
	label: " \u{00b5}g/m\u{00b3}",
	observations: &["pm2_5", "pm10_0"],
};

impl UnitGroup {
	pub fn group_of(observation: &str) -> Option<&'static UnitGroup> {
		CONCENTRATION
			.observations
			.contains(&observation)
			.then_some(&CONCENTRATION)
	}

	pub fn format_value(&self, value: f64) -> String {
		format!("{value:.3}{}", self.label)
	}
}
