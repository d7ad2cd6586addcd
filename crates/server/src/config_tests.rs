// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn paths_hang_off_the_data_dir() {
    let config = Config::at("/srv/tasse");
    assert_eq!(config.tasks_dir, PathBuf::from("/srv/tasse/tasks"));
    assert_eq!(config.logs_dir, PathBuf::from("/srv/tasse/logs"));
    assert_eq!(config.venvs_dir, PathBuf::from("/srv/tasse/venvs"));
    assert_eq!(config.store_path, PathBuf::from("/srv/tasse/jobs.json"));
    assert_eq!(config.lock_path, PathBuf::from("/srv/tasse/tassed.pid"));
}

#[test]
#[serial_test::serial]
fn env_var_overrides_the_data_dir() {
    std::env::set_var("TASSE_DATA_DIR", "/tmp/tasse-test");
    let config = Config::load().unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/tmp/tasse-test"));
    std::env::remove_var("TASSE_DATA_DIR");
}

#[test]
#[serial_test::serial]
fn bind_and_scan_interval_come_from_the_environment() {
    std::env::set_var("TASSE_DATA_DIR", "/tmp/tasse-test");
    std::env::set_var("TASSE_BIND", "127.0.0.1:8099");
    std::env::set_var("TASSE_SCAN_SECS", "5");

    let config = Config::load().unwrap();
    assert_eq!(config.bind_addr.port(), 8099);
    assert_eq!(config.scan_interval, Duration::from_secs(5));

    std::env::remove_var("TASSE_DATA_DIR");
    std::env::remove_var("TASSE_BIND");
    std::env::remove_var("TASSE_SCAN_SECS");
}

#[test]
#[serial_test::serial]
fn malformed_bind_address_is_rejected() {
    std::env::set_var("TASSE_DATA_DIR", "/tmp/tasse-test");
    std::env::set_var("TASSE_BIND", "not-an-address");

    let err = Config::load().unwrap_err();
    assert!(matches!(err, LifecycleError::BadBindAddr { .. }));

    std::env::remove_var("TASSE_DATA_DIR");
    std::env::remove_var("TASSE_BIND");
}
