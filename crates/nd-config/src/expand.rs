//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (errors when unset) and `${VAR:-default}`.

use crate::ConfigError;

/// Expand environment variable references in a configuration string.
///
/// `field` names the config field for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("unterminated ${{...}} in \"{value}\""),
            });
        };
        let inner = &after[..end];
        out.push_str(&resolve(inner, field)?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn resolve(inner: &str, field: &str) -> Result<String, ConfigError> {
    let (name, default) = match inner.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (inner, None),
    };

    if name.is_empty() {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: "empty variable name".to_owned(),
        });
    }

    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(_) => match default {
            Some(default) => Ok(default.to_owned()),
            None => Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{name}}} not set"),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_literal_passes_through() {
        assert_eq!(expand_env("plain value", "f").unwrap(), "plain value");
    }

    #[test]
    fn test_expands_set_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("ND_EXPAND_TEST", "secret");
        }
        assert_eq!(expand_env("${ND_EXPAND_TEST}", "f").unwrap(), "secret");
        unsafe {
            std::env::remove_var("ND_EXPAND_TEST");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("ND_EXPAND_MISSING");
        }
        assert_eq!(
            expand_env("${ND_EXPAND_MISSING:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_missing_required_errors_with_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("ND_EXPAND_MISSING");
        }
        let err = expand_env("${ND_EXPAND_MISSING}", "notion.token").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("notion.token"), "got: {msg}");
        assert!(msg.contains("ND_EXPAND_MISSING"), "got: {msg}");
    }

    #[test]
    fn test_expansion_inside_literal_text() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("ND_EXPAND_MID", "abc");
        }
        assert_eq!(expand_env("pre-${ND_EXPAND_MID}-post", "f").unwrap(), "pre-abc-post");
        unsafe {
            std::env::remove_var("ND_EXPAND_MID");
        }
    }

    #[test]
    fn test_unterminated_reference_errors() {
        assert!(expand_env("${OOPS", "f").is_err());
    }
}
