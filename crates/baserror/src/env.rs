//! Environment variable helpers for configuration overrides.
//!
//! ```ignore
//! use crate::env::{env_get, env_get_bool};
//!
//! let depth: usize = env_get("BASERR_STACK_DEPTH", 3);
//! let capture = env_get_bool("BASERR_CAPTURE", true);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default.
///
/// Unset variables and values that fail to parse both yield `default`.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Get environment variable as boolean.
///
/// Accepts "1", "true", "yes", "on" as true and "0", "false", "no", "off"
/// as false (case-insensitive). Anything else, including unset, returns
/// the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
