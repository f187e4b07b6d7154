use std::fs::{self, File};
use tempfile::tempdir;

use siradio_cli::commands::listen;
use siradio_cli::{Overrides, Settings};
use siradio_core::encoder::encode_punches;
use siradio_core::transport::SerialTransport;
use siradio_core::PunchRecord;

/// Helper: a recorded station session on disk, read back as the device
fn create_device(records: &[PunchRecord]) -> (tempfile::TempDir, std::path::PathBuf) {
    let td = tempdir().unwrap();
    let device = td.path().join("ttyUSB0");
    fs::write(&device, encode_punches(records).unwrap()).unwrap();
    (td, device)
}

fn replay(device: &std::path::Path, settings: &Settings) -> SerialTransport<File> {
    SerialTransport::new(File::open(device).unwrap(), settings.serial())
}

fn records() -> Vec<PunchRecord> {
    vec![
        PunchRecord::new(31, 412_345, 36_000),
        PunchRecord::new(31, 8_654_321, 50_000),
    ]
}

#[test]
fn listen_relays_messages_to_output() {
    let (td, device) = create_device(&records());
    let out_path = td.path().join("outbox.txt");

    let settings = Settings::load(
        None,
        Overrides {
            destination: Some("+15550100".into()),
            ..Default::default()
        },
    )
    .unwrap();

    listen::relay(
        replay(&device, &settings),
        &settings,
        Some(out_path.to_str().unwrap()),
    )
    .unwrap();

    let outbox = fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = outbox.lines().collect();
    assert_eq!(
        lines,
        vec![
            "+15550100\tSMSRC 31 412345 36000",
            "+15550100\tSMSRC 31 8654321 50000",
        ]
    );
}

#[test]
fn listen_applies_control_override() {
    let (td, device) = create_device(&records());
    let out_path = td.path().join("outbox.txt");
    let config_path = td.path().join("settings.json");
    fs::write(
        &config_path,
        r#"{"baud_rate": 0, "destination": "+15550100", "control_number": 7}"#,
    )
    .unwrap();

    let settings = Settings::load(config_path.to_str(), Overrides::default()).unwrap();
    assert_eq!(settings.effective_baud_rate(), 38_400);

    listen::relay(
        replay(&device, &settings),
        &settings,
        Some(out_path.to_str().unwrap()),
    )
    .unwrap();

    let outbox = fs::read_to_string(&out_path).unwrap();
    assert!(outbox.lines().all(|l| l.contains("SMSRC 7 ")));
    assert_eq!(outbox.lines().count(), 2);
}

#[test]
fn listen_without_destination_sends_nothing() {
    let (td, device) = create_device(&records());
    let out_path = td.path().join("outbox.txt");

    let settings = Settings::default();
    listen::relay(
        replay(&device, &settings),
        &settings,
        Some(out_path.to_str().unwrap()),
    )
    .unwrap();

    assert!(fs::read_to_string(&out_path).unwrap().is_empty());
}

#[test]
fn listen_missing_device() {
    let td = tempdir().unwrap();
    let device = td.path().join("ttyUSB9");

    let result = listen::execute(device.to_str().unwrap(), &Settings::default(), None);
    assert!(result.is_err());
}

#[cfg(unix)]
#[test]
fn listen_refuses_a_regular_file_as_device() {
    // The line speed cannot be applied to something that is not a terminal
    let (_td, device) = create_device(&records());

    let result = listen::execute(device.to_str().unwrap(), &Settings::default(), None);
    assert!(result.is_err());
}
