mod common;

use std::time::Duration;

use common::{data_frame, garbage, RecordingSleeper, ScriptedTransport};
use sds011::consts::{HEAD, METRICWX};
use sds011::{Device, DriverConfig, DriverState, Error, Poller, Reading};

fn config(poll_interval: u64, max_tries: u32, retry_wait: u64) -> DriverConfig {
	DriverConfig::builder()
		.poll_interval(poll_interval)
		.max_tries(max_tries)
		.retry_wait(retry_wait)
		.build()
		.unwrap()
}

fn poller<'a>(
	cfg: DriverConfig,
	link: &ScriptedTransport,
	sleeper: &'a mut RecordingSleeper,
) -> Poller<impl FnMut() -> sds011::Result<Reading>, &'a mut RecordingSleeper> {
	let mut dev = Device::new(link.clone(), cfg.timeout());
	Poller::with_sleeper(cfg, move || dev.query_data(), sleeper)
}

#[test]
fn transient_failures_cost_exactly_k_retry_waits() {
	for k in 0..3u32 {
		let link = ScriptedTransport::new();
		for _ in 0..k {
			link.stay_silent();
		}
		link.reply_with(data_frame(700, 1500));
		let mut sleeper = RecordingSleeper::default();
		let mut p = poller(config(10, 3, 5), &link, &mut sleeper);

		let record = p.next().unwrap().unwrap();
		assert_eq!(record.pm2_5, 70.0);
		assert_eq!(record.pm10_0, 150.0);
		assert_eq!(p.state(), DriverState::Idle);
		drop(p);

		assert_eq!(link.written().len(), k as usize + 1);
		assert_eq!(sleeper.total(), Duration::from_secs(5) * k);
	}
}

#[test]
fn exhausting_the_budget_fails_after_exactly_max_tries() {
	let link = ScriptedTransport::new();
	for _ in 0..10 {
		link.stay_silent();
	}
	let mut sleeper = RecordingSleeper::default();
	let mut p = poller(config(10, 3, 5), &link, &mut sleeper);

	match p.next() {
		Some(Err(Error::MaxRetriesExceeded { tries, last })) => {
			assert_eq!(tries, 3);
			assert!(last.is_timeout());
		}
		other => panic!("expected MaxRetriesExceeded, got {other:?}"),
	}
	assert_eq!(p.state(), DriverState::Failed);
	assert!(p.next().is_none());
	drop(p);

	assert_eq!(link.written().len(), 3);
	assert_eq!(sleeper.calls, vec![Duration::from_secs(5); 2]);
}

#[test]
fn mixed_failures_are_all_retried() {
	let link = ScriptedTransport::new();
	link.reply_with(garbage(2000));
	link.reply_with(vec![HEAD, 0x00]);
	link.reply_with(data_frame(250, 300));
	let mut sleeper = RecordingSleeper::default();
	let mut p = poller(config(10, 3, 1), &link, &mut sleeper);

	let record = p.next().unwrap().unwrap();
	assert_eq!(record.pm2_5, 25.0);
	assert_eq!(record.pm10_0, 30.0);
}

#[test]
fn end_to_end_scenario() {
	let link = ScriptedTransport::new();
	link.reply_with(data_frame(0x02BC, 0x05DC));
	let mut sleeper = RecordingSleeper::default();
	let mut p = poller(config(10, 3, 5), &link, &mut sleeper);

	let record = p.next().unwrap().unwrap();
	assert_eq!(record.pm2_5, 70.0);
	assert_eq!(record.pm10_0, 150.0);
	assert_eq!(record.us_units, METRICWX);
	assert!(record.date_time > 0);
	drop(p);
	assert!(sleeper.calls.is_empty());
}

#[test]
fn every_tick_after_the_first_waits_the_poll_interval() {
	let link = ScriptedTransport::new();
	for i in 0..3 {
		link.reply_with(data_frame(100 + i, 200 + i));
	}
	let mut sleeper = RecordingSleeper::default();
	let mut p = poller(config(10, 3, 5), &link, &mut sleeper);

	let values: Vec<f64> = p.by_ref().take(3).map(|r| r.unwrap().pm2_5).collect();
	assert_eq!(values, vec![10.0, 10.1, 10.2]);
	drop(p);
	assert_eq!(sleeper.total(), Duration::from_secs(20));
}

#[test]
fn shutdown_ends_the_sequence_and_releases_the_transport() {
	let link = ScriptedTransport::new();
	link.reply_with(data_frame(1, 2));
	let mut sleeper = RecordingSleeper::default();
	let mut p = poller(config(10, 3, 5), &link, &mut sleeper);
	let stop = p.shutdown_handle();

	assert!(p.next().unwrap().is_ok());
	stop.request();
	assert!(p.next().is_none());
	p.close();

	assert_eq!(link.close_count(), 1);
	assert_eq!(link.written().len(), 1);
}

#[test]
fn records_serialize_with_host_field_names() {
	let link = ScriptedTransport::new();
	link.reply_with(data_frame(700, 1500));
	let mut sleeper = RecordingSleeper::default();
	let mut p = poller(config(10, 1, 5), &link, &mut sleeper);

	let record = p.next().unwrap().unwrap();
	let json = serde_json::to_value(&record).unwrap();
	assert_eq!(json["usUnits"], 0x11);
	assert_eq!(json["pm2_5"], 70.0);
	assert_eq!(json["pm10_0"], 150.0);
	assert!(json["dateTime"].as_i64().unwrap() > 0);
	assert_eq!(json.as_object().unwrap().len(), 4);
	assert!(json.get("interval").is_none());
}

#[test]
fn hardware_name_is_the_configured_model() {
	let cfg = DriverConfig::builder().model("SDS011-lab").build().unwrap();
	let p = Poller::new(cfg, || Ok(Reading::new(0.0, 0.0, 0)));
	assert_eq!(p.hardware_name(), "SDS011-lab");
}
