//! Sale config loading tests
//!
//! Run:
//!     cargo test --test sale_config_tests

use ido_swap_sdk::{SALE_CONFIG_ENV, SaleConfig, SalePhase, SwapError};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(raw: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(raw.as_bytes()).expect("write config");
    file
}

const HOPERS_SALE: &str = r#"{
    "id": "hopers",
    "contract": "juno1saleaddress",
    "symbol": "HOPERS",
    "schedule": { "start": "2022-09-01T00:00:00Z", "end": "2022-09-08T00:00:00Z" }
}"#;

#[test]
fn test_load_from_file() {
    let file = write_config(HOPERS_SALE);
    let sale = SaleConfig::from_file(file.path()).unwrap();

    assert_eq!(sale.id, "hopers");
    assert_eq!(sale.symbol, "HOPERS");
    // the window lies in the past
    assert_eq!(sale.schedule.unwrap().current_phase(), SalePhase::Ended);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SaleConfig::from_file(dir.path().join("missing.json"));
    assert!(matches!(result, Err(SwapError::Config(_))));
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = write_config("{ \"id\": \"hopers\", ");
    assert!(matches!(SaleConfig::from_file(file.path()), Err(SwapError::Config(_))));
}

#[test]
#[serial]
fn test_load_from_env() {
    let file = write_config(HOPERS_SALE);
    // SAFETY: serialised with the other env tests
    unsafe { std::env::set_var(SALE_CONFIG_ENV, file.path()) };
    let sale = SaleConfig::from_env();
    unsafe { std::env::remove_var(SALE_CONFIG_ENV) };

    assert_eq!(sale.unwrap().contract, "juno1saleaddress");
}

#[test]
#[serial]
fn test_unset_env_is_config_error() {
    // SAFETY: serialised with the other env tests
    unsafe { std::env::remove_var(SALE_CONFIG_ENV) };
    assert!(matches!(SaleConfig::from_env(), Err(SwapError::Config(_))));
}
