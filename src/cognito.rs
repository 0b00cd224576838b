//! # Cognito User Pool Client
//!
//! Client for the Cognito user-pool API surface this tool consumes.
//!
//! This module provides functionality to:
//! - List all app clients of a user pool, following pagination to exhaustion
//! - Resolve an app client by display name (case-insensitive, first match)
//! - Fetch the credential record for a resolved client (token URL + secret)

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{COGNITO_HOST_SUFFIX, LIST_CLIENTS_PAGE_SIZE, OAUTH_TOKEN_PATH};
use crate::error::SyncError;

/// Identity of one app client as returned by the listing API.
///
/// Transient: lives only for the duration of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppClientIdentity {
    pub pool_id: String,
    pub client_id: String,
    pub client_name: String,
}

/// The provider-issued material a dependent service uses to authenticate.
///
/// This is the unit of comparison for change detection and the value embedded
/// at `auth.cognito` in the stored configuration document.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
}

// The secret must never reach logs, so Debug redacts it.
impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("url", &self.url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// One page of app clients plus the continuation token for the next page
#[derive(Debug, Clone, Default)]
pub struct AppClientPage {
    pub clients: Vec<AppClientIdentity>,
    pub next_token: Option<String>,
}

/// User pool API trait
///
/// Abstracts the three Cognito calls the pipeline makes so the reconciler can
/// be driven by in-memory implementations in tests.
#[async_trait]
pub trait UserPoolApi: Send + Sync {
    /// Fetch one page of app clients for the pool
    async fn list_app_clients_page(
        &self,
        pool_id: &str,
        next_token: Option<String>,
    ) -> Result<AppClientPage, SyncError>;

    /// Fetch the hosted-UI domain prefix configured on the pool
    async fn describe_pool_domain(&self, pool_id: &str) -> Result<String, SyncError>;

    /// Fetch the client secret (the listing API does not expose it)
    async fn describe_client_secret(
        &self,
        pool_id: &str,
        client_id: &str,
    ) -> Result<String, SyncError>;
}

/// List every app client of the pool, following continuation tokens until
/// exhausted. Blocks until all pages are fetched; a failed page aborts the
/// whole listing (no partial result).
pub async fn list_app_clients(
    api: &dyn UserPoolApi,
    pool_id: &str,
) -> Result<Vec<AppClientIdentity>, SyncError> {
    let mut clients = Vec::new();
    let mut next_token = None;

    loop {
        let page = api.list_app_clients_page(pool_id, next_token).await?;
        debug!(
            pool_id,
            page_size = page.clients.len(),
            has_more = page.next_token.is_some(),
            "fetched app client page"
        );
        clients.extend(page.clients);

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    Ok(clients)
}

/// Find the first app client whose display name matches `name`
/// case-insensitively. First match in listing order wins, which keeps the
/// selection deterministic even if the pool somehow holds duplicate names.
pub fn resolve_app_client<'a>(
    clients: &'a [AppClientIdentity],
    name: &str,
) -> Option<&'a AppClientIdentity> {
    let wanted = name.to_lowercase();
    clients
        .iter()
        .find(|c| c.client_name.to_lowercase() == wanted)
}

/// Synthesize the OAuth2 token endpoint from the pool's hosted-UI domain
/// prefix and the region. Cognito does not return this URL as a field; the
/// hosted-UI routing convention is assumed. Wrong for custom domains.
pub fn token_url(domain: &str, region: &str) -> String {
    format!("https://{domain}.auth.{region}.{COGNITO_HOST_SUFFIX}{OAUTH_TOKEN_PATH}")
}

/// Fetch the credential record for a resolved app client.
///
/// The domain and secret lookups are independent, so they are issued
/// concurrently. Either failure aborts the fetch.
pub async fn fetch_credentials(
    api: &dyn UserPoolApi,
    region: &str,
    client: &AppClientIdentity,
) -> Result<CredentialRecord, SyncError> {
    let (domain, secret) = tokio::try_join!(
        api.describe_pool_domain(&client.pool_id),
        api.describe_client_secret(&client.pool_id, &client.client_id),
    )?;

    Ok(CredentialRecord {
        url: token_url(&domain, region),
        client_id: client.client_id.clone(),
        client_secret: secret,
    })
}

/// Cognito-backed implementation of [`UserPoolApi`]
#[derive(Debug, Clone)]
pub struct CognitoUserPools {
    client: CognitoClient,
}

impl CognitoUserPools {
    /// Create a client from an already-loaded SDK config. Region and
    /// credentials come from the config, not from ambient process state.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: CognitoClient::new(sdk_config),
        }
    }
}

#[async_trait]
impl UserPoolApi for CognitoUserPools {
    async fn list_app_clients_page(
        &self,
        pool_id: &str,
        next_token: Option<String>,
    ) -> Result<AppClientPage, SyncError> {
        let output = self
            .client
            .list_user_pool_clients()
            .user_pool_id(pool_id)
            .max_results(LIST_CLIENTS_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                SyncError::Provider(
                    anyhow::Error::new(e).context(format!("listing app clients of {pool_id}")),
                )
            })?;

        let clients = output
            .user_pool_clients()
            .iter()
            .map(|c| AppClientIdentity {
                pool_id: c.user_pool_id().unwrap_or(pool_id).to_string(),
                client_id: c.client_id().unwrap_or_default().to_string(),
                client_name: c.client_name().unwrap_or_default().to_string(),
            })
            .collect();

        Ok(AppClientPage {
            clients,
            next_token: output.next_token().map(String::from),
        })
    }

    async fn describe_pool_domain(&self, pool_id: &str) -> Result<String, SyncError> {
        let output = self
            .client
            .describe_user_pool()
            .user_pool_id(pool_id)
            .send()
            .await
            .map_err(|e| {
                SyncError::Provider(
                    anyhow::Error::new(e).context(format!("describing user pool {pool_id}")),
                )
            })?;

        let domain: Result<String> = output
            .user_pool()
            .and_then(|p| p.domain())
            .map(String::from)
            .with_context(|| format!("user pool {pool_id} has no hosted-UI domain configured"));
        domain.map_err(SyncError::Provider)
    }

    async fn describe_client_secret(
        &self,
        pool_id: &str,
        client_id: &str,
    ) -> Result<String, SyncError> {
        let output = self
            .client
            .describe_user_pool_client()
            .user_pool_id(pool_id)
            .client_id(client_id)
            .send()
            .await
            .map_err(|e| {
                SyncError::Provider(
                    anyhow::Error::new(e)
                        .context(format!("describing app client {client_id} of {pool_id}")),
                )
            })?;

        let secret: Result<String> = output
            .user_pool_client()
            .and_then(|c| c.client_secret())
            .map(String::from)
            .with_context(|| format!("app client {client_id} has no client secret"));
        secret.map_err(SyncError::Provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, id: &str) -> AppClientIdentity {
        AppClientIdentity {
            pool_id: "eu-west-1_TEST".to_string(),
            client_id: id.to_string(),
            client_name: name.to_string(),
        }
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let clients = vec![client("other", "c1"), client("myclient", "c2")];

        let found = resolve_app_client(&clients, "MyClient").expect("should match");
        assert_eq!(found.client_id, "c2");
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let clients = vec![
            client("Web", "first"),
            client("web", "second"),
            client("WEB", "third"),
        ];

        let found = resolve_app_client(&clients, "wEb").expect("should match");
        assert_eq!(found.client_id, "first");
    }

    #[test]
    fn test_resolve_no_match() {
        let clients = vec![client("web", "c1"), client("mobile", "c2")];

        assert!(resolve_app_client(&clients, "desktop").is_none());
        assert!(resolve_app_client(&[], "web").is_none());
    }

    #[test]
    fn test_resolve_exact_match_only() {
        // Substrings must not match
        let clients = vec![client("myclient-dev", "c1")];
        assert!(resolve_app_client(&clients, "myclient").is_none());
    }

    #[test]
    fn test_token_url_synthesis() {
        assert_eq!(
            token_url("acme-auth", "eu-west-1"),
            "https://acme-auth.auth.eu-west-1.amazoncognito.com/oauth2/token"
        );
    }

    #[test]
    fn test_credential_record_debug_redacts_secret() {
        let record = CredentialRecord {
            url: "https://example.auth.us-east-1.amazoncognito.com/oauth2/token".to_string(),
            client_id: "abc".to_string(),
            client_secret: "super-secret".to_string(),
        };

        let rendered = format!("{record:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
