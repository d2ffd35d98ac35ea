//! Tests for CLI output formatting helpers

use docmine::cli::output::{format_bytes, format_duration};

#[test]
fn test_format_bytes_boundaries() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
}

#[test]
fn test_format_duration_ranges() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.042), "42ms");
    assert_eq!(format_duration(12.5), "12.50s");
    assert_eq!(format_duration(120.0), "2m 0.0s");
}
