//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::PortError;

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("jwt_secret must not be empty");

    match &error {
        CoreError::Configuration(msg) => assert_eq!(msg, "jwt_secret must not be empty"),
    }
    assert!(error.to_string().contains("Configuration error"));
}

#[test]
fn test_port_error_conflict() {
    let error = PortError::conflict("username John.Smith already exists");
    assert!(error.is_conflict());
    assert!(!error.is_not_found());
}

#[test]
fn test_port_error_transient_kinds() {
    assert!(PortError::connection("refused").is_transient());
    assert!(!PortError::validation("bad input").is_transient());
}
