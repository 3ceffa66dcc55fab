// ABOUTME: Validated logical deployment name and the Azure resource names derived from it.
// ABOUTME: Names double as site host labels, so they follow RFC 1123 label rules.

use super::resource_group_name::ResourceGroupName;
use std::fmt;
use thiserror::Error;

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppNameError {
    #[error("deployment name must be at least 2 characters")]
    TooShort,

    #[error("deployment name exceeds maximum length of 60 characters")]
    TooLong,

    #[error("deployment name cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("deployment name cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("deployment name must be lowercase")]
    NotLowercase,

    #[error("invalid character in deployment name: '{0}'")]
    InvalidChar(char),
}

/// Logical name of a deployment.
///
/// Every resource created for a deployment is named after it: the resource
/// group carries the name verbatim, dependent resources use derived names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    pub fn new(value: &str) -> Result<Self, AppNameError> {
        if value.len() < MIN_LEN {
            return Err(AppNameError::TooShort);
        }

        if value.len() > MAX_LEN {
            return Err(AppNameError::TooLong);
        }

        if value.starts_with('-') {
            return Err(AppNameError::StartsWithHyphen);
        }

        if value.ends_with('-') {
            return Err(AppNameError::EndsWithHyphen);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(AppNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(AppNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The resource group scoping this deployment.
    ///
    /// Infallible: the app name alphabet is a subset of the resource group alphabet.
    pub fn resource_group(&self) -> ResourceGroupName {
        ResourceGroupName::from_app_name(self)
    }

    /// Storage account name: `st` + alphanumerics, at most 24 characters.
    pub fn storage_account_name(&self) -> String {
        compact_name("st", &self.0, 24, 3)
    }

    /// Container registry name: `cr` + alphanumerics, 5 to 50 characters.
    pub fn registry_name(&self) -> String {
        compact_name("cr", &self.0, 50, 5)
    }

    pub fn plan_name(&self) -> String {
        format!("{}-plan", self.0)
    }

    pub fn environment_name(&self) -> String {
        format!("{}-env", self.0)
    }

    /// Container apps allow at most 32 characters.
    pub fn container_app_name(&self) -> String {
        truncate_label(&self.0, 32)
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strip hyphens, prefix, truncate to `max` and pad with zeros up to `min`.
fn compact_name(prefix: &str, name: &str, max: usize, min: usize) -> String {
    let mut out: String = prefix
        .chars()
        .chain(name.chars().filter(|c| c.is_ascii_alphanumeric()))
        .take(max)
        .collect();
    while out.len() < min {
        out.push('0');
    }
    out
}

fn truncate_label(name: &str, max: usize) -> String {
    let truncated: String = name.chars().take(max).collect();
    truncated.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names_are_compact() {
        let name = AppName::new("orders-api").unwrap();
        assert_eq!(name.storage_account_name(), "stordersapi");
        assert_eq!(name.registry_name(), "crordersapi");
        assert_eq!(name.plan_name(), "orders-api-plan");
        assert_eq!(name.environment_name(), "orders-api-env");
    }

    #[test]
    fn storage_account_name_is_truncated() {
        let name = AppName::new("a-very-long-deployment-name-for-storage").unwrap();
        let storage = name.storage_account_name();
        assert_eq!(storage.len(), 24);
        assert!(storage.starts_with("stavery"));
    }

    #[test]
    fn registry_name_is_padded_to_minimum() {
        let name = AppName::new("ab").unwrap();
        assert_eq!(name.registry_name(), "crab0");
    }

    #[test]
    fn container_app_name_does_not_end_with_hyphen() {
        let name = AppName::new("abcdefghijklmnopqrstuvwxyz01234-suffix").unwrap();
        let app = name.container_app_name();
        assert!(app.len() <= 32);
        assert!(!app.ends_with('-'));
    }
}
