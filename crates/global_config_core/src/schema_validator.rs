//! JSON Schema validation of the global configuration document.
//!
//! The document may reference a schema (`config.schema_url` or the root
//! `$schema` key). When it does, the schema is fetched and the whole document
//! is validated against it. Validation never stops a run by itself; whether
//! a rejected document aborts generation is decided by the caller's
//! [`ValidationPolicy`](crate::settings::ValidationPolicy).

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    errors::{GenerationError, GenerationResult},
    global_config::GlobalConfig,
    report_log::ReportLog,
};

#[cfg(test)]
#[path = "schema_validator_tests.rs"]
mod tests;

/// Retrieves JSON Schema documents by URL.
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    /// Fetches and parses the schema at `url`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Transport` when the schema cannot be
    /// retrieved and `GenerationError::Parse` when it is not JSON.
    async fn fetch_schema(&self, url: &str) -> GenerationResult<Value>;
}

/// Fetches schemas over HTTP with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpSchemaFetcher {
    client: reqwest::Client,
}

impl HttpSchemaFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> GenerationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport {
                url: String::new(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SchemaFetcher for HttpSchemaFetcher {
    async fn fetch_schema(&self, url: &str) -> GenerationResult<Value> {
        let transport = |e: reqwest::Error| GenerationError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        let body = response.text().await.map_err(transport)?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| GenerationError::Parse {
            source_name: format!("JSON schema '{url}'"),
            reason: e.to_string(),
        })
    }
}

/// What a successful validation call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The document references no schema.
    NoSchema,
    /// The referenced schema is empty.
    EmptySchema { schema_url: String },
    /// The document satisfies the referenced schema.
    Valid { schema_url: String },
}

/// Validates global configuration documents against their referenced schema.
#[derive(Clone)]
pub struct SchemaValidator {
    fetcher: Arc<dyn SchemaFetcher>,
}

impl SchemaValidator {
    pub fn new(fetcher: Arc<dyn SchemaFetcher>) -> Self {
        Self { fetcher }
    }

    /// Validates `config`, recording the outcome in `log`.
    ///
    /// Returns `false` only when a referenced schema could not be fetched or
    /// parsed, or when the document violates it.
    pub async fn validate(&self, config: &GlobalConfig, log: &mut ReportLog) -> bool {
        self.validate_reporting(config, log).await.is_ok()
    }

    /// Like [`validate`](Self::validate), but hands the failure back.
    pub async fn validate_reporting(
        &self,
        config: &GlobalConfig,
        log: &mut ReportLog,
    ) -> GenerationResult<ValidationOutcome> {
        match self.check(config).await {
            Ok(outcome) => {
                match &outcome {
                    ValidationOutcome::NoSchema => log.warning(
                        "No JSON schema referenced in globalConfig.json. Schema validation skipped.",
                    ),
                    ValidationOutcome::EmptySchema { schema_url } => log.warning(format!(
                        "JSON schema '{schema_url}' is empty. Schema validation skipped."
                    )),
                    ValidationOutcome::Valid { schema_url } => log.info(format!(
                        "globalConfig.json is valid against schema '{schema_url}'."
                    )),
                }
                Ok(outcome)
            }
            Err(error) => {
                log.error(error.to_string());
                Err(error)
            }
        }
    }

    /// Fetches the referenced schema and validates the document against it.
    #[instrument(skip_all, fields(schema_url = config.schema_url().unwrap_or("")))]
    pub async fn check(&self, config: &GlobalConfig) -> GenerationResult<ValidationOutcome> {
        let Some(schema_url) = config.schema_url() else {
            return Ok(ValidationOutcome::NoSchema);
        };
        let schema_url = schema_url.to_string();

        let schema = self.fetcher.fetch_schema(&schema_url).await?;
        if is_empty_schema(&schema) {
            return Ok(ValidationOutcome::EmptySchema { schema_url });
        }

        debug!("Validating globalConfig.json against schema");

        // Schema compilation may resolve remote references with blocking I/O.
        let document = config.document().clone();
        let url = schema_url.clone();
        tokio::task::spawn_blocking(move || validate_document(&url, &schema, &document))
            .await
            .map_err(|e| GenerationError::Parse {
                source_name: format!("JSON schema '{schema_url}'"),
                reason: e.to_string(),
            })??;

        Ok(ValidationOutcome::Valid { schema_url })
    }
}

fn is_empty_schema(schema: &Value) -> bool {
    match schema {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Validates `document` against an already fetched `schema`.
///
/// # Errors
///
/// Returns `GenerationError::Parse` if `schema` is not a usable JSON Schema
/// and `GenerationError::Validation` listing every violation otherwise.
pub fn validate_document(schema_url: &str, schema: &Value, document: &Value) -> GenerationResult<()> {
    let validator = jsonschema::validator_for(schema).map_err(|e| GenerationError::Parse {
        source_name: format!("JSON schema '{schema_url}'"),
        reason: e.to_string(),
    })?;

    let messages: Vec<String> = validator
        .iter_errors(document)
        .map(|error| error.to_string())
        .collect();

    if messages.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::Validation {
            schema_url: schema_url.to_string(),
            messages,
        })
    }
}
