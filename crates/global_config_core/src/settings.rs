//! Generator settings.
//!
//! Settings are resolved once per process from environment variables and
//! handed to every run. The global document may still override the
//! downstream service URL for a single run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{
    downstream::DEFAULT_CONFIG_GENERATOR_SERVICE_URL,
    errors::{GenerationError, GenerationResult},
};

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

pub const INPUT_CONFIG_PATH_VAR: &str = "INPUT_CONFIG_PATH";
pub const CONFIG_GENERATOR_SERVICE_URL_VAR: &str = "CONFIG_GENERATOR_SERVICE_URL";
pub const REQUEST_TIMEOUT_SECS_VAR: &str = "REQUEST_TIMEOUT_SECS";
pub const SCHEMA_VALIDATION_VAR: &str = "SCHEMA_VALIDATION";

/// Input directory used when none is configured.
pub const DEFAULT_INPUT_CONFIG_PATH: &str = "config-in/";

/// Timeout applied to schema fetches and downstream requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What a failed schema validation means for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Report the failure and keep generating.
    #[default]
    Advisory,

    /// Abort the run before any tenant is attempted.
    Enforce,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationPolicy::Advisory => "advisory",
            ValidationPolicy::Enforce => "enforce",
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationPolicy {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(ValidationPolicy::Advisory),
            "enforce" => Ok(ValidationPolicy::Enforce),
            _ => Err(GenerationError::InvalidSetting {
                name: SCHEMA_VALIDATION_VAR.to_string(),
                value: s.to_string(),
                reason: "expected 'advisory' or 'enforce'".to_string(),
            }),
        }
    }
}

/// Process-wide generator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Directory holding `globalConfig.json`, `index.html` and tenant output.
    pub input_dir: PathBuf,

    /// Downstream base URL used unless the global document names one.
    pub config_generator_service_url: String,

    pub request_timeout: Duration,

    pub validation_policy: ValidationPolicy,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_CONFIG_PATH),
            config_generator_service_url: DEFAULT_CONFIG_GENERATOR_SERVICE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            validation_policy: ValidationPolicy::Advisory,
        }
    }
}

impl GeneratorSettings {
    /// Settings for `input_dir` with every other value at its default.
    pub fn for_input_dir(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_config_generator_service_url(mut self, url: impl Into<String>) -> Self {
        self.config_generator_service_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_validation_policy(mut self, policy: ValidationPolicy) -> Self {
        self.validation_policy = policy;
        self
    }

    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidSetting` if a variable is set to an
    /// unusable value.
    pub fn from_env() -> GenerationResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`; unset or blank values use defaults.
    pub fn from_lookup<F>(lookup: F) -> GenerationResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();

        if let Some(path) = get(INPUT_CONFIG_PATH_VAR) {
            settings.input_dir = PathBuf::from(path);
        }

        if let Some(url) = get(CONFIG_GENERATOR_SERVICE_URL_VAR) {
            settings.config_generator_service_url = url;
        }

        if let Some(value) = get(REQUEST_TIMEOUT_SECS_VAR) {
            settings.request_timeout = parse_timeout(&value)?;
        }

        if let Some(value) = get(SCHEMA_VALIDATION_VAR) {
            settings.validation_policy = value.parse()?;
        }

        Ok(settings)
    }
}

fn parse_timeout(value: &str) -> GenerationResult<Duration> {
    let invalid = |reason: &str| GenerationError::InvalidSetting {
        name: REQUEST_TIMEOUT_SECS_VAR.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let seconds: u64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("expected a whole number of seconds"))?;
    if seconds == 0 {
        return Err(invalid("timeout must be at least one second"));
    }
    Ok(Duration::from_secs(seconds))
}
