//! # Parameter Store Client
//!
//! Client for the SSM Parameter Store key-value API this tool consumes.
//!
//! "Parameter not found" on read is a valid outcome (first-ever run), so
//! [`ParameterStore::get`] returns `Ok(None)` for it rather than an error.
//! Writes always overwrite (last-writer-wins; SSM offers no conditional put)
//! and use the `SecureString` type because the document carries a client
//! secret.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::types::ParameterType;
use aws_sdk_ssm::Client as SsmClient;
use tracing::info;

use crate::error::SyncError;

/// Parameter store trait
///
/// Abstract read/write interface over the remote configuration store so the
/// reconciler can be tested against an in-memory store.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Get the raw parameter value. `Ok(None)` means the parameter does not
    /// exist yet; any other failure is a [`SyncError::StoreRead`].
    async fn get(&self, name: &str) -> Result<Option<String>, SyncError>;

    /// Overwrite the parameter with `value`, encrypted at rest
    async fn put(&self, name: &str, value: &str) -> Result<(), SyncError>;
}

/// SSM Parameter Store implementation of [`ParameterStore`]
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: SsmClient,
}

impl SsmParameterStore {
    /// Create a client from an already-loaded SDK config
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: SsmClient::new(sdk_config),
        }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>, SyncError> {
        match self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
        {
            Ok(output) => Ok(output
                .parameter()
                .and_then(|p| p.value())
                .map(String::from)),
            Err(err) => match err.into_service_error() {
                e if e.is_parameter_not_found() => Ok(None),
                e => Err(SyncError::StoreRead {
                    name: name.to_string(),
                    source: anyhow::Error::new(e),
                }),
            },
        }
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), SyncError> {
        info!(parameter = name, "writing parameter");
        self.client
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(ParameterType::SecureString)
            .overwrite(true)
            .send()
            .await
            .map_err(|e| SyncError::StoreWrite {
                name: name.to_string(),
                source: anyhow::Error::new(e),
            })?;
        Ok(())
    }
}
