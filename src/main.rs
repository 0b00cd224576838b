//! # Cognito Parameter Sync
//!
//! Post-deploy hook that mirrors a Cognito app client's credentials into an
//! SSM Parameter Store configuration document.
//!
//! ## Overview
//!
//! After a deployment completes, dependent services need the current token
//! endpoint URL, client id, and client secret of the deployed app client.
//! This binary reconciles them into the `auth.cognito` section of a shared
//! JSON parameter, leaving every other section of the document untouched,
//! and writes only when a credential field actually changed.
//!
//! ## Usage
//!
//! ```bash
//! cognito-param-sync \
//!     --user-pool-id eu-west-1_AbCdEfGhI \
//!     --app-client-name my-service \
//!     --parameter-name /my-app/config \
//!     --region eu-west-1
//! ```
//!
//! Exit code 0 means the store matches the provider (written or already up
//! to date); any failure exits non-zero so deploy pipelines can detect it.
//!
//! Two simultaneous runs against the same parameter race (SSM has no
//! conditional put); last writer wins. Deployment pipelines trigger this
//! once per deploy, so the race is accepted and documented rather than
//! solved.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use cognito_param_sync::cognito::CognitoUserPools;
use cognito_param_sync::store::SsmParameterStore;
use cognito_param_sync::{Outcome, Reconciler, SyncConfig, SyncOptions};

/// Sync Cognito app client credentials into an SSM parameter
#[derive(Debug, Parser)]
#[command(name = "cognito-param-sync")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ", ", env!("BUILD_DATETIME"), ")"))]
struct Cli {
    /// User pool holding the app client
    #[arg(long, env = "COGNITO_USER_POOL_ID")]
    user_pool_id: String,

    /// Display name of the app client to sync (case-insensitive)
    #[arg(long, env = "COGNITO_APP_CLIENT_NAME")]
    app_client_name: String,

    /// SSM parameter holding the application configuration document
    #[arg(long, env = "SYNC_PARAMETER_NAME")]
    parameter_name: String,

    /// AWS region for both Cognito and SSM
    #[arg(long, env = "AWS_REGION")]
    region: String,

    /// Fail the run on parameter read errors instead of falling back to an
    /// empty document
    #[arg(long)]
    strict_read: bool,

    /// Run the full pipeline but do not write the parameter
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cognito_param_sync=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = SyncConfig {
        user_pool_id: cli.user_pool_id,
        app_client_name: cli.app_client_name,
        parameter_name: cli.parameter_name,
        region: cli.region,
    };
    config
        .validate()
        .context("invalid sync configuration")?;

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .load()
        .await;

    let reconciler = Reconciler::new(
        Arc::new(CognitoUserPools::new(&sdk_config)),
        Arc::new(SsmParameterStore::new(&sdk_config)),
        SyncOptions {
            strict_read: cli.strict_read,
            dry_run: cli.dry_run,
        },
    );

    match reconciler.run(&config).await {
        Ok(Outcome::Written) => {
            info!("credential sync complete: parameter updated");
            Ok(())
        }
        Ok(Outcome::Unchanged) => {
            info!("credential sync complete: no changes");
            Ok(())
        }
        Err(e) => {
            let err = anyhow::Error::new(e);
            error!("credential sync failed: {err:#}");
            Err(err)
        }
    }
}
