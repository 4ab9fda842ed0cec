//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// Strings without `${` are returned unchanged, so a bare `$` is kept as-is.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.var_name),
    })
}

/// Variable lookup failure.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("CALLOUT_TEST_PREFIX_SET", "notice");
        }
        let result = expand_env("${CALLOUT_TEST_PREFIX_SET}", "markup.class_prefix").unwrap();
        assert_eq!(result, "notice");
        unsafe {
            std::env::remove_var("CALLOUT_TEST_PREFIX_SET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("CALLOUT_TEST_PREFIX_UNSET");
        }
        let result =
            expand_env("${CALLOUT_TEST_PREFIX_UNSET:-msg}", "markup.class_prefix").unwrap();
        assert_eq!(result, "msg");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("CALLOUT_TEST_PREFIX_PART", "docs");
        }
        let result = expand_env("${CALLOUT_TEST_PREFIX_PART}-box", "markup.class_prefix").unwrap();
        assert_eq!(result, "docs-box");
        unsafe {
            std::env::remove_var("CALLOUT_TEST_PREFIX_PART");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("CALLOUT_TEST_PREFIX_MISSING");
        }
        let err = expand_env("${CALLOUT_TEST_PREFIX_MISSING}", "markup.class_prefix").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("CALLOUT_TEST_PREFIX_MISSING"));
        assert!(err.to_string().contains("markup.class_prefix"));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("message", "f").unwrap(), "message");
        assert_eq!(expand_env("$VAR", "f").unwrap(), "$VAR");
    }
}
