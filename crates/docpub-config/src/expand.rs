//! Environment variable expansion for configuration strings.
//!
//! Supports two forms:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses the default
//!
//! Text outside `${...}` references passes through unchanged. An unclosed
//! `${` is a validation error.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] if a referenced variable is unset and no
/// default is given, or if a `${` reference is never closed.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("unclosed ${{ in \"{value}\""),
            });
        };

        let reference = &after[..end];
        result.push_str(&resolve(reference, field)?);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Resolve a single `VAR` or `VAR:-default` reference.
fn resolve(reference: &str, field: &str) -> Result<String, ConfigError> {
    let (name, default) = match reference.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (reference, None),
    };

    match std::env::var(name) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(default) => Ok(default.to_owned()),
            None => Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{name}}} not set"),
            }),
        },
    }
}
