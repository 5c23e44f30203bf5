//! Runs one authentication sample against the in-memory cloud.

use std::sync::Arc;
use std::time::Duration;
use vault_samples::{
    run_all_samples, AuthenticationSample, MockCloud, ReadinessPoller, SampleConfig,
    SampleProvider,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let config = SampleConfig::from_env();
    let cloud = Arc::new(MockCloud::new());

    let poller = ReadinessPoller::new().with_retry_wait(Duration::from_millis(100));
    let provider: Arc<dyn SampleProvider> = Arc::new(
        AuthenticationSample::new(config, cloud.clone(), cloud.clone(), cloud.clone())
            .with_poller(poller),
    );

    let requested = vec!["auth_using_service_principal_credentials".to_string()];
    run_all_samples(&[provider], &requested, false).await;

    // the sample leaves its proof-of-authentication secret behind
    for name in cloud.vault_names().await {
        let vault = cloud.vault(&name).await.expect("vault exists");
        let uri = vault.vault_uri().expect("uri assigned").to_string();
        let value = cloud.secret_value(&uri, "auth-sample-secret").await;
        println!("{name}: auth-sample-secret = {value:?}");
    }
}
