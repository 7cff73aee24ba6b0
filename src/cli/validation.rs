//! CLI argument validation functions
//!
//! Custom value parsers for arguments that clap cannot validate by type alone.

use std::fs;
use std::path::PathBuf;

/// Longest viewer id accepted, matching the HTTP query validation.
const MAX_VIEWER_ID_LEN: usize = 128;

/// Validate port number is within valid range (1-65535)
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// Validate that a file path exists, is a file, and is readable
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}

/// Validate host address format (basic validation)
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.contains(' ') {
        return Err("Host address cannot contain spaces".to_string());
    }

    // Dotted-digit input must be a real IPv4 address
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return host
            .parse::<std::net::Ipv4Addr>()
            .map(|_| host.to_string())
            .map_err(|_| format!("Invalid IPv4 address format: '{}'", host_str));
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    Ok(host.to_string())
}

/// Validate a viewer id given on the command line
pub fn validate_viewer_id(viewer_id: &str) -> Result<String, String> {
    let viewer_id = viewer_id.trim();

    if viewer_id.is_empty() {
        return Err("Viewer id cannot be empty".to_string());
    }

    if viewer_id.len() > MAX_VIEWER_ID_LEN {
        return Err(format!(
            "Viewer id is too long (maximum {} characters)",
            MAX_VIEWER_ID_LEN
        ));
    }

    Ok(viewer_id.to_string())
}
