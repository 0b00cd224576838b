//! # Error Types
//!
//! Error taxonomy for a reconciliation run.
//!
//! Every failure is terminal for the run in which it occurs: nothing is
//! retried, and the binary maps the error to a non-zero exit code so deploy
//! pipelines can detect failure without scraping logs.

use thiserror::Error;

/// Errors that can end a reconciliation run
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required configuration field is missing or empty. Raised before any
    /// AWS call is made.
    #[error("missing required configuration: {0}")]
    Configuration(&'static str),

    /// The user pool returned zero app clients (or listing failed closed)
    #[error("user pool {pool_id} has no app clients")]
    NoAppClients { pool_id: String },

    /// No app client in the pool matched the configured name
    #[error("no app client named {name:?} in user pool {pool_id}")]
    ClientNotFound { pool_id: String, name: String },

    /// A Cognito API call (list/describe) failed
    #[error("user pool api call failed")]
    Provider(#[source] anyhow::Error),

    /// Reading the parameter failed with something other than "not found".
    /// Only fatal when strict reads are enabled; otherwise the run proceeds
    /// against an empty document.
    #[error("failed to read parameter {name}")]
    StoreRead {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Writing the merged document back failed
    #[error("failed to write parameter {name}")]
    StoreWrite {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}
