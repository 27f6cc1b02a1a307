//! Error message quality tests
//!
//! Tests that verify error messages are helpful and distinguishable.

use pihole_statsd_exporter::error::ExporterError;
use pihole_statsd_exporter::pihole::connection::AttemptFailure;
use reqwest::StatusCode;

#[test]
fn test_connection_error_names_host() {
    // Given: A negotiation failure
    let error = ExporterError::Connection {
        host: "pi.hole".to_string(),
    };

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message names the host and the cause
    assert!(message.contains("pi.hole"));
    assert!(message.contains("no protocol/port combination worked"));
}

#[test]
fn test_api_error_message_clarity() {
    let error = ExporterError::PiholeApi("summary request failed (HTTP 500)".to_string());

    let message = format!("{}", error);

    assert!(message.contains("Pi-hole API error"));
    assert!(message.contains("HTTP 500"));
}

#[test]
fn test_config_error_message_clarity() {
    // Given: A configuration error
    let error = ExporterError::Config("pihole.host must not be empty".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate configuration issue
    assert!(message.contains("Configuration error"));
    assert!(message.contains("pihole.host"));
}

#[test]
fn test_json_error_message_clarity() {
    // Given: A JSON parsing error
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let error = ExporterError::Json(json_err);

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate JSON issue
    assert!(message.contains("JSON error"));
}

#[test]
fn test_url_error_message_clarity() {
    let url_err = url::Url::parse("http://").unwrap_err();
    let error = ExporterError::from(url_err);

    assert!(format!("{}", error).starts_with("Invalid URL"));
}

#[test]
fn test_error_messages_are_distinguishable() {
    // Given: Different error types
    let config_err = format!("{}", ExporterError::Config("test".to_string()));
    let api_err = format!("{}", ExporterError::PiholeApi("test".to_string()));
    let metric_err = format!("{}", ExporterError::Metric("test".to_string()));

    // Then: Each should have a unique prefix
    assert!(config_err.starts_with("Configuration error"));
    assert!(api_err.starts_with("Pi-hole API error"));
    assert!(metric_err.starts_with("Metric rejected"));
    assert_ne!(config_err, api_err);
    assert_ne!(api_err, metric_err);
}

#[test]
fn test_attempt_failure_categories() {
    // Given: Each per-candidate failure category
    let status = AttemptFailure::Status(StatusCode::UNAUTHORIZED);
    let tls = AttemptFailure::Tls("invalid peer certificate".to_string());
    let connect = AttemptFailure::Connect("connection refused".to_string());
    let timeout = AttemptFailure::Timeout;
    let unexpected = AttemptFailure::Unexpected("invalid auth response".to_string());

    // Then: Messages name the category
    assert!(status.to_string().contains("401"));
    assert!(tls.to_string().starts_with("TLS failure"));
    assert!(connect.to_string().starts_with("connection failure"));
    assert_eq!(timeout.to_string(), "timed out");

    // Then: Only unexpected failures are escalated
    assert!(status.is_transport());
    assert!(tls.is_transport());
    assert!(connect.is_transport());
    assert!(timeout.is_transport());
    assert!(!unexpected.is_transport());
}

#[test]
fn test_exporter_error_becomes_unexpected_attempt_failure() {
    let failure = AttemptFailure::from(ExporterError::Config("bad".to_string()));
    assert!(matches!(failure, AttemptFailure::Unexpected(_)));
}

#[test]
fn test_error_debug_format() {
    let error = ExporterError::Connection {
        host: "pi.hole".to_string(),
    };

    let debug_message = format!("{:?}", error);

    assert!(debug_message.contains("Connection"));
    assert!(debug_message.contains("pi.hole"));
}
