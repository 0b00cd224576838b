//! # Constants
//!
//! Shared constants used throughout the sync tool.

/// Host suffix of Cognito hosted-UI domains. The token endpoint is synthesized
/// as `https://{domain}.auth.{region}.{suffix}/oauth2/token`; custom domains
/// configured on the pool are not covered by this pattern.
pub const COGNITO_HOST_SUFFIX: &str = "amazoncognito.com";

/// Path of the OAuth2 token endpoint on the hosted-UI domain
pub const OAUTH_TOKEN_PATH: &str = "/oauth2/token";

/// Top-level key of the configuration document that holds auth settings
pub const AUTH_KEY: &str = "auth";

/// Key under [`AUTH_KEY`] where the Cognito credential record is embedded
pub const COGNITO_KEY: &str = "cognito";

/// Page size for ListUserPoolClients (60 is the API maximum)
pub const LIST_CLIENTS_PAGE_SIZE: i32 = 60;
