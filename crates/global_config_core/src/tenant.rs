//! Tenant identifiers.
//!
//! A tenant identifier names an output directory below the input root, so it
//! is validated before anything is written on its behalf.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

use crate::errors::{GenerationError, GenerationResult};

#[cfg(test)]
#[path = "tenant_tests.rs"]
mod tests;

/// Message reported for specific configs without a usable `tenant` field.
pub const MISSING_TENANT_MESSAGE: &str =
    "'tenant' parameter missing or empty. 'tenant' parameter should be present in each specific config.";

/// A validated tenant identifier.
///
/// Tenant identifiers must:
/// - Be non-empty
/// - Not be `.` or `..`
/// - Not contain path separators (`/`, `\`) or control characters
///
/// # Examples
///
/// ```
/// use global_config_core::TenantId;
///
/// let tenant = TenantId::try_new("alpha").unwrap();
/// assert_eq!(tenant.as_str(), "alpha");
///
/// assert!(TenantId::try_new("").is_err());
/// assert!(TenantId::try_new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Validates and wraps a tenant identifier.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidTenant` when the identifier is empty
    /// or cannot be used as a single directory name.
    pub fn try_new(id: impl Into<String>) -> GenerationResult<Self> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(GenerationError::InvalidTenant {
                reason: MISSING_TENANT_MESSAGE.to_string(),
            });
        }

        if id == "." || id == ".." {
            return Err(GenerationError::InvalidTenant {
                reason: format!("tenant '{id}' is not a valid directory name"),
            });
        }

        if id.contains(['/', '\\']) {
            return Err(GenerationError::InvalidTenant {
                reason: format!("tenant '{id}' must not contain path separators"),
            });
        }

        if id.chars().any(char::is_control) {
            return Err(GenerationError::InvalidTenant {
                reason: format!("tenant '{}' must not contain control characters", id.escape_default()),
            });
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for TenantId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = GenerationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TenantId::try_new(value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}
