//! Cognito Parameter Sync Library
//!
//! This library provides the core functionality for syncing a Cognito app
//! client's credentials (token endpoint URL, client id, client secret) into
//! an SSM Parameter Store parameter that holds a JSON application
//! configuration document.
//!
//! The binary runs once per deployment event as a post-deploy hook. One
//! invocation is one reconciliation run:
//!
//! 1. List all app clients of the configured user pool (paginated)
//! 2. Resolve the target client by display name (case-insensitive)
//! 3. Fetch its credential record (hosted-UI token URL + client secret)
//! 4. Merge the record into the stored document at `auth.cognito`,
//!    preserving all unrelated content
//! 5. Write back only if a credential field actually changed
//!
//! Tests are included in the module files and in `tests/`.

use serde::{Deserialize, Serialize};

pub mod cognito;
pub mod constants;
pub mod error;
pub mod merge;
pub mod reconciler;
pub mod store;

pub use error::SyncError;
pub use reconciler::{Outcome, Reconciler, SyncOptions};

/// Inputs of one reconciliation run. All fields are required; validation
/// happens before any AWS call is made.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// User pool holding the app client (e.g. "eu-west-1_AbCdEfGhI")
    pub user_pool_id: String,
    /// Display name of the app client to sync (matched case-insensitively)
    pub app_client_name: String,
    /// Name of the SSM parameter holding the configuration document
    pub parameter_name: String,
    /// AWS region, also used to synthesize the hosted-UI token URL
    pub region: String,
}

impl SyncConfig {
    /// Check that every required field is present. Reconciliation must not
    /// proceed without all of them.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.user_pool_id.is_empty() {
            return Err(SyncError::Configuration("userPoolId"));
        }
        if self.app_client_name.is_empty() {
            return Err(SyncError::Configuration("appClientName"));
        }
        if self.parameter_name.is_empty() {
            return Err(SyncError::Configuration("parameterName"));
        }
        if self.region.is_empty() {
            return Err(SyncError::Configuration("region"));
        }
        Ok(())
    }
}
