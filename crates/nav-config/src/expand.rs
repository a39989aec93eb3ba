//! `${VAR}` and `${VAR:-default}` references in configuration values.
//!
//! Only the braced form is recognized; a bare `$VAR` stays literal. A
//! reference to an unset variable without a default is an error naming the
//! configuration field it appeared in.

use std::borrow::Cow;
use std::env::{self, VarError};

use crate::ConfigError;

/// Resolve the variable references in `value`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: match e.cause {
                VarError::NotPresent => format!("${{{}}} not set", e.var_name),
                VarError::NotUnicode(_) => format!("${{{}}} is not valid unicode", e.var_name),
            },
        })
}

/// Resolve the references of an optional value in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand_env(raw, field)?);
    }
    Ok(())
}

fn lookup(name: &str) -> Result<Option<String>, VarError> {
    env::var(name).map(Some)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Sets a variable for the lifetime of the guard. Each test uses its own
    /// variable names.
    struct ScopedVar(&'static str);

    impl ScopedVar {
        fn set(name: &'static str, value: &str) -> Self {
            // SAFETY: names are unique per test, nothing else reads them.
            unsafe { env::set_var(name, value) };
            Self(name)
        }

        fn unset(name: &'static str) -> Self {
            // SAFETY: names are unique per test, nothing else reads them.
            unsafe { env::remove_var(name) };
            Self(name)
        }
    }

    impl Drop for ScopedVar {
        fn drop(&mut self) {
            // SAFETY: see `ScopedVar::set`.
            unsafe { env::remove_var(self.0) };
        }
    }

    #[test]
    fn test_base_url_host_from_env() {
        let _host = ScopedVar::set("NAV_EXPAND_HOST", "cms.example.com");

        let url = expand_env("https://${NAV_EXPAND_HOST}/Rhythmyx", "links.base_url").unwrap();

        assert_eq!(url, "https://cms.example.com/Rhythmyx");
    }

    #[test]
    fn test_default_used_when_unset() {
        let _dir = ScopedVar::unset("NAV_EXPAND_CACHE_ROOT");

        let dir = expand_env("${NAV_EXPAND_CACHE_ROOT:-.cache}/navtree", "cache.dir").unwrap();

        assert_eq!(dir, ".cache/navtree");
    }

    #[test]
    fn test_unset_variable_names_field() {
        let _missing = ScopedVar::unset("NAV_EXPAND_SNAPSHOT");

        let err = expand_env("${NAV_EXPAND_SNAPSHOT}", "repository.snapshot").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("repository.snapshot"));
        assert!(message.contains("NAV_EXPAND_SNAPSHOT"));
    }

    #[test]
    fn test_bare_dollar_kept() {
        assert_eq!(expand_env("cost$5", "links.base_url").unwrap(), "cost$5");
    }

    #[test]
    fn test_optional_values() {
        let mut unset = None;
        expand_opt(&mut unset, "cache.dir").unwrap();
        assert_eq!(unset, None);

        let mut literal = Some("navigation.yaml".to_owned());
        expand_opt(&mut literal, "repository.snapshot").unwrap();
        assert_eq!(literal.as_deref(), Some("navigation.yaml"));
    }
}
