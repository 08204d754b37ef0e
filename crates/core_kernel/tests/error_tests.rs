//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::PortError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("ordering must contain at least one term");

    match error {
        CoreError::Validation(msg) => assert!(msg.contains("at least one term")),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_invalid_identifier() {
    let error = CoreError::invalid_identifier("bad column");

    match error {
        CoreError::InvalidIdentifier(name) => assert_eq!(name, "bad column"),
        _ => panic!("Expected InvalidIdentifier error"),
    }
}

#[test]
fn test_core_error_display() {
    let error = CoreError::invalid_identifier("score; --");
    let display = format!("{}", error);

    assert!(display.contains("Invalid identifier"));
    assert!(display.contains("score; --"));
}

#[test]
fn test_port_error_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = PortError::connection_from("database unreachable", io);

    assert!(error.is_transient());
    assert_eq!(error.kind(), "connection");
    assert!(std::error::Error::source(&error).is_some());
}
