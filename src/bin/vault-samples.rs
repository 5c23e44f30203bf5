//! Command-line runner for the key vault samples.
//!
//! Configuration comes from the environment with placeholder defaults; every
//! credential field can be overridden with a flag. Samples run against the
//! in-memory cloud stand-in, so an out-of-the-box run needs no subscription.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vault_samples::{
    run_all_samples, AuthenticationSample, MockCloud, ReadinessPoller, SampleConfig,
    SampleProvider,
};

/// Runs the key vault authentication samples.
#[derive(Parser)]
#[command(name = "vault-samples", version, about)]
struct Cli {
    /// Run only samples marked safe for CI.
    #[arg(long)]
    ci: bool,

    /// Tenant to run the samples in.
    #[arg(long)]
    tenant_id: Option<String>,

    /// Subscription to create resources in.
    #[arg(long)]
    subscription_id: Option<String>,

    /// Client id of the service principal running the samples.
    #[arg(long)]
    client_id: Option<String>,

    /// Object id of the service principal running the samples.
    #[arg(long)]
    client_oid: Option<String>,

    /// Authentication secret of the service principal.
    #[arg(long)]
    client_secret: Option<String>,

    /// Names of specific samples to run (default: all).
    #[arg(long, num_args = 0..)]
    samples: Vec<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = SampleConfig::from_env();
    if let Some(v) = cli.tenant_id {
        config = config.with_tenant_id(v);
    }
    if let Some(v) = cli.subscription_id {
        config = config.with_subscription_id(v);
    }
    if let Some(v) = cli.client_id {
        config = config.with_client_id(v);
    }
    if let Some(v) = cli.client_oid {
        config = config.with_client_oid(v);
    }
    if let Some(v) = cli.client_secret {
        config = config.with_client_secret(v);
    }

    // The stand-in cloud propagates quickly, so the poller can wait far less
    // than it would against a real endpoint. One injected connectivity
    // failure still exercises the retry path.
    let cloud = Arc::new(MockCloud::new().with_connect_failures(1));
    let poller = ReadinessPoller::new().with_retry_wait(Duration::from_millis(500));

    let provider: Arc<dyn SampleProvider> = Arc::new(
        AuthenticationSample::new(config, cloud.clone(), cloud.clone(), cloud.clone())
            .with_poller(poller),
    );

    run_all_samples(&[provider], &cli.samples, cli.ci).await;
}
