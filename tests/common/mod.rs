//! Shared in-memory test doubles for the reconciler pipeline.
//!
//! `MockUserPools` serves app clients from pre-built pages and records how
//! many page requests were made; `MockStore` is a single-slot parameter
//! store that counts writes. Both can be told to fail to exercise the error
//! paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use cognito_param_sync::cognito::{AppClientIdentity, AppClientPage, UserPoolApi};
use cognito_param_sync::store::ParameterStore;
use cognito_param_sync::{SyncConfig, SyncError};

pub const POOL_ID: &str = "eu-west-1_TestPool";
pub const REGION: &str = "eu-west-1";
pub const PARAMETER: &str = "/acme/app/config";

pub fn test_config(app_client_name: &str) -> SyncConfig {
    SyncConfig {
        user_pool_id: POOL_ID.to_string(),
        app_client_name: app_client_name.to_string(),
        parameter_name: PARAMETER.to_string(),
        region: REGION.to_string(),
    }
}

pub fn app_client(name: &str, id: &str) -> AppClientIdentity {
    AppClientIdentity {
        pool_id: POOL_ID.to_string(),
        client_id: id.to_string(),
        client_name: name.to_string(),
    }
}

#[derive(Default)]
pub struct MockUserPools {
    /// Pages returned in order; a continuation token is attached to every
    /// page but the last
    pub pages: Vec<Vec<AppClientIdentity>>,
    pub domain: String,
    pub secret: String,
    pub fail_listing_at_page: Option<usize>,
    pub fail_describe: bool,
    pub page_requests: AtomicUsize,
}

impl MockUserPools {
    pub fn with_clients(clients: Vec<AppClientIdentity>) -> Self {
        Self {
            pages: vec![clients],
            domain: "acme-auth".to_string(),
            secret: "pool-secret".to_string(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl UserPoolApi for MockUserPools {
    async fn list_app_clients_page(
        &self,
        _pool_id: &str,
        next_token: Option<String>,
    ) -> Result<AppClientPage, SyncError> {
        let index = next_token
            .as_deref()
            .map_or(0, |t| t.parse::<usize>().expect("numeric mock token"));
        self.page_requests.fetch_add(1, Ordering::SeqCst);

        if self.fail_listing_at_page == Some(index) {
            return Err(SyncError::Provider(anyhow::anyhow!(
                "listing failed on page {index}"
            )));
        }

        let clients = self.pages.get(index).cloned().unwrap_or_default();
        let next_token = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(AppClientPage {
            clients,
            next_token,
        })
    }

    async fn describe_pool_domain(&self, _pool_id: &str) -> Result<String, SyncError> {
        if self.fail_describe {
            return Err(SyncError::Provider(anyhow::anyhow!("describe failed")));
        }
        Ok(self.domain.clone())
    }

    async fn describe_client_secret(
        &self,
        _pool_id: &str,
        _client_id: &str,
    ) -> Result<String, SyncError> {
        if self.fail_describe {
            return Err(SyncError::Provider(anyhow::anyhow!("describe failed")));
        }
        Ok(self.secret.clone())
    }
}

#[derive(Default)]
pub struct MockStore {
    pub value: Mutex<Option<String>>,
    pub fail_get: bool,
    pub fail_put: bool,
    pub puts: AtomicUsize,
}

impl MockStore {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<String> {
        self.value.lock().expect("store lock").clone()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterStore for MockStore {
    async fn get(&self, name: &str) -> Result<Option<String>, SyncError> {
        if self.fail_get {
            return Err(SyncError::StoreRead {
                name: name.to_string(),
                source: anyhow::anyhow!("simulated read failure"),
            });
        }
        Ok(self.stored())
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), SyncError> {
        if self.fail_put {
            return Err(SyncError::StoreWrite {
                name: name.to_string(),
                source: anyhow::anyhow!("simulated write failure"),
            });
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        *self.value.lock().expect("store lock") = Some(value.to_string());
        Ok(())
    }
}
