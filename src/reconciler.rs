//! # Reconciler
//!
//! Core reconciliation logic: one end-to-end run of the
//! list, resolve, fetch, read, compare, conditional-write pipeline.
//!
//! ## Reconciliation Flow
//!
//! 1. Validate the sync configuration (fail before any AWS call)
//! 2. List all app clients of the pool (all pages)
//! 3. Resolve the target client by name (case-insensitive, first match)
//! 4. Fetch the credential record (pool domain + client secret, concurrently)
//! 5. Read the stored configuration document (missing parameter = empty doc)
//! 6. Compare against the record embedded at `auth.cognito`
//! 7. Write the merged document only if something changed
//!
//! No step retries. The run is stateless; the only persistent entity is the
//! parameter owned by the store, read once and conditionally written once.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::cognito::{fetch_credentials, list_app_clients, resolve_app_client, UserPoolApi};
use crate::error::SyncError;
use crate::merge::{credentials_at, merge_credentials, to_tab_json};
use crate::store::ParameterStore;
use crate::SyncConfig;

/// Result of a successful reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The merged document was written (or would have been, under dry-run)
    Written,
    /// The stored record already matches the provider; nothing written
    Unchanged,
}

/// Behavior switches that do not affect what is synced, only how
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Treat a non-"not found" read failure as fatal instead of falling back
    /// to an empty document. The lenient default preserves availability but
    /// can clobber unrelated config on a transient read error.
    pub strict_read: bool,
    /// Run the full pipeline but skip the write
    pub dry_run: bool,
}

/// Drives one reconciliation run against a user pool API and a parameter
/// store. Both collaborators are trait objects so tests can substitute
/// in-memory implementations.
pub struct Reconciler {
    pools: Arc<dyn UserPoolApi>,
    store: Arc<dyn ParameterStore>,
    options: SyncOptions,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(
        pools: Arc<dyn UserPoolApi>,
        store: Arc<dyn ParameterStore>,
        options: SyncOptions,
    ) -> Self {
        Self {
            pools,
            store,
            options,
        }
    }

    /// Run one reconciliation. Every failure is terminal for the run and the
    /// store is left untouched unless the write itself fails mid-flight
    /// (nothing else is mutated, so no rollback is needed).
    pub async fn run(&self, config: &SyncConfig) -> Result<Outcome, SyncError> {
        config.validate()?;

        info!(
            pool_id = %config.user_pool_id,
            app_client = %config.app_client_name,
            parameter = %config.parameter_name,
            "reconciling app client credentials"
        );

        let clients = match list_app_clients(self.pools.as_ref(), &config.user_pool_id).await {
            Ok(clients) => clients,
            Err(e) => {
                error!(pool_id = %config.user_pool_id, error = ?e, "failed to list app clients");
                return Err(e);
            }
        };
        if clients.is_empty() {
            error!(pool_id = %config.user_pool_id, "user pool has no app clients");
            return Err(SyncError::NoAppClients {
                pool_id: config.user_pool_id.clone(),
            });
        }

        let Some(client) = resolve_app_client(&clients, &config.app_client_name) else {
            error!(
                pool_id = %config.user_pool_id,
                app_client = %config.app_client_name,
                candidates = clients.len(),
                "no app client matched the configured name"
            );
            return Err(SyncError::ClientNotFound {
                pool_id: config.user_pool_id.clone(),
                name: config.app_client_name.clone(),
            });
        };
        info!(
            client_id = %client.client_id,
            client_name = %client.client_name,
            "resolved app client"
        );

        let record = fetch_credentials(self.pools.as_ref(), &config.region, client).await?;

        let existing = self.read_document(&config.parameter_name).await?;

        if let Some(current) = credentials_at(&existing) {
            if current == record {
                info!(
                    parameter = %config.parameter_name,
                    "credentials unchanged, skipping write"
                );
                return Ok(Outcome::Unchanged);
            }
        }

        let merged = merge_credentials(&existing, &record);
        let body = to_tab_json(&merged).map_err(|e| SyncError::StoreWrite {
            name: config.parameter_name.clone(),
            source: anyhow::Error::new(e).context("serializing merged document"),
        })?;

        if self.options.dry_run {
            info!(
                parameter = %config.parameter_name,
                "dry-run: credentials changed, skipping write"
            );
            return Ok(Outcome::Written);
        }

        self.store.put(&config.parameter_name, &body).await?;
        info!(
            parameter = %config.parameter_name,
            "credentials written to parameter store"
        );
        Ok(Outcome::Written)
    }

    /// Read the stored document. A missing parameter is a valid outcome
    /// (first-ever run) and yields the empty document. Other read failures,
    /// and an unparseable stored value, are fatal under `strict_read` and
    /// otherwise fall back to the empty document with a warning.
    async fn read_document(&self, name: &str) -> Result<Value, SyncError> {
        let raw = match self.store.get(name).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!(parameter = name, "parameter not found, starting from empty document");
                return Ok(Value::Object(serde_json::Map::new()));
            }
            Err(e) if self.options.strict_read => return Err(e),
            Err(e) => {
                warn!(
                    parameter = name,
                    error = ?e,
                    "read failed, proceeding with empty document"
                );
                return Ok(Value::Object(serde_json::Map::new()));
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => Ok(doc),
            Err(e) if self.options.strict_read => Err(SyncError::StoreRead {
                name: name.to_string(),
                source: anyhow::Error::new(e).context("parsing stored document"),
            }),
            Err(e) => {
                warn!(
                    parameter = name,
                    error = %e,
                    "stored document is not valid JSON, proceeding with empty document"
                );
                Ok(Value::Object(serde_json::Map::new()))
            }
        }
    }
}
