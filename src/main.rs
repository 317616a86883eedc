mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use sds011::consts::DRIVER_VERSION;
use sds011::types::units::CONCENTRATION;
use sds011::{driver, Device, DriverConfig, DriverConfigBuilder, SerialTransport};

use cli::Cli;

fn main() -> Result<()> {
	let cli = Cli::parse();

	if cli.version {
		println!("driver version {DRIVER_VERSION}");
		return Ok(());
	}

	init_logging(cli.debug);
	let config = build_config(&cli)?;

	let mut dev = Device::open(config.port(), config.timeout())
		.with_context(|| format!("failed to open {}", config.port()))?
		.strict(config.strict());

	if cli.info {
		println!("firmware: {}", dev.get_firmware_version()?);
		return Ok(());
	}

	if let Some(id) = cli.device_id {
		println!("set id to {id}");
		dev.set_device_id(id)?;
	} else if let Some(mode) = cli.device_mode {
		let mode = mode.into();
		println!("set mode to {mode}");
		dev.set_mode(mode)?;
	} else if let Some(sleep) = cli.sleep {
		println!("set sleep to {sleep}");
		dev.set_sleep(sleep)?;
	} else if let Some(work) = cli.work {
		println!("set work to {work}");
		dev.set_working_period(work)?;
	} else {
		cmd_read_loop(dev, config)?;
	}
	Ok(())
}

fn init_logging(debug: bool) {
	let level = if debug { "debug" } else { "info" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
		.format_target(false)
		.init();
}

fn build_config(cli: &Cli) -> Result<DriverConfig> {
	let mut builder = match &cli.config {
		Some(path) => DriverConfigBuilder::load(path)?,
		None => DriverConfig::builder(),
	};
	if let Some(port) = &cli.port {
		builder = builder.port(port.clone());
	}
	if let Some(timeout) = cli.timeout {
		builder = builder.timeout_secs(timeout);
	}
	if let Some(interval) = cli.poll_interval {
		builder = builder.poll_interval(interval);
	}
	if cli.strict {
		builder = builder.strict(true);
	}
	Ok(builder.build()?)
}

fn cmd_read_loop(mut dev: Device<SerialTransport>, config: DriverConfig) -> Result<()> {
	dev.wake()?;
	eprintln!(
		"Sensor awake, first reading in {}s (Ctrl+C to stop)...",
		config.poll_interval_secs()
	);
	std::thread::sleep(config.poll_interval());

	for record in driver::poll_device(config, dev) {
		let record = record?;
		println!(
			"pm2_5={} pm10_0={}",
			CONCENTRATION.format_value(record.pm2_5),
			CONCENTRATION.format_value(record.pm10_0)
		);
	}
	Ok(())
}
