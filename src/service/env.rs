use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{0} is required but not set")]
    Missing(String),
    #[error("{name} must be an integer (got {value:?})")]
    NotAnInteger { name: String, value: String },
}

/// Read a required environment variable; unset or blank is a fatal
/// configuration error.
pub fn require_env(name: &str) -> Result<String, EnvError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EnvError::Missing(name.to_string())),
    }
}

/// Read an optional environment variable; blank counts as unset.
pub fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Integer environment variable with a safe fallback.
///
/// Unset or blank values resolve to `default`; a value that cannot be parsed
/// as an integer is reported with the variable name.
pub fn get_int_env(name: &str, default: i64) -> Result<i64, EnvError> {
    let raw = match env::var(name) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }

    trimmed
        .parse::<i64>()
        .map_err(|_| EnvError::NotAnInteger {
            name: name.to_string(),
            value: raw.clone(),
        })
}

/// Boolean flag semantics: `0`, `false`, `no`, and `off` disable, anything
/// else enables; unset falls back to `default`.
pub fn get_bool_env(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => {
            let normalized = value.trim().to_ascii_lowercase();
            if normalized.is_empty() {
                default
            } else {
                !matches!(normalized.as_str(), "0" | "false" | "no" | "off")
            }
        }
        Err(_) => default,
    }
}
