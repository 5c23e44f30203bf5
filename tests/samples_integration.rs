//! End-to-end scenarios driving the sample runner against the in-memory
//! cloud: configuration, provisioning, the readiness gate, and both
//! credential flows, with assertions on exactly what the fake services saw.

use std::sync::Arc;
use vault_samples::{
    plan, run_all_samples, AuthenticationSample, MockCloud, SampleConfig, SampleProvider,
};

fn test_config() -> SampleConfig {
    SampleConfig::from_env()
        .with_subscription_id("test-subscription")
        .with_tenant_id("test-tenant")
        .with_client_id("test-client")
        .with_client_oid("test-oid")
        .with_client_secret("test-secret")
        .with_location("westus")
        .with_group_name("sample-group")
}

fn provider_for(cloud: &Arc<MockCloud>) -> AuthenticationSample {
    AuthenticationSample::new(
        test_config(),
        cloud.clone(),
        cloud.clone(),
        cloud.clone(),
    )
}

#[tokio::test(start_paused = true)]
async fn service_principal_sample_round_trips_a_secret() {
    // two injected connectivity failures force the readiness poller to retry
    let cloud = Arc::new(MockCloud::new().with_connect_failures(2));
    let sample = provider_for(&cloud);

    sample.setup().await.expect("setup succeeds");
    sample
        .run_sample("auth_using_service_principal_credentials")
        .await
        .expect("sample succeeds");

    let vaults = cloud.vault_names().await;
    assert_eq!(vaults.len(), 1, "the sample creates exactly one vault");

    let vault = cloud.vault(&vaults[0]).await.expect("vault exists");
    let uri = vault.vault_uri().expect("uri assigned").to_string();
    assert_eq!(
        cloud.secret_value(&uri, "auth-sample-secret").await.as_deref(),
        Some("vault is authenticated"),
    );

    // the access policy grants the configured identity access
    let policy = &vault.properties.access_policies[0];
    assert_eq!(policy.tenant_id, "test-tenant");
    assert_eq!(policy.object_id, "test-oid");

    // the readiness probe runs before the first secret write, and the
    // injected failures mean it ran more than once
    let calls = cloud.calls().await;
    let first_probe = calls.iter().position(|c| c == "list_secrets").unwrap();
    let first_set = calls
        .iter()
        .position(|c| c == "set_secret:auth-sample-secret")
        .unwrap();
    assert!(first_probe < first_set);
    assert!(calls.iter().filter(|c| *c == "list_secrets").count() >= 3);
}

#[tokio::test(start_paused = true)]
async fn token_callback_sample_round_trips_a_secret() {
    let cloud = Arc::new(MockCloud::new());
    let sample = provider_for(&cloud);

    sample.setup().await.expect("setup succeeds");
    sample
        .run_sample("auth_using_token_callback")
        .await
        .expect("sample succeeds");

    let vaults = cloud.vault_names().await;
    let vault = cloud.vault(&vaults[0]).await.expect("vault exists");
    let uri = vault.vault_uri().expect("uri assigned").to_string();
    assert_eq!(
        cloud
            .secret_value(&uri, "callback-sample-secret")
            .await
            .as_deref(),
        Some("vault is authenticated"),
    );

    // the callback flow pre-acquires a token from the identity endpoint
    let acquisitions = cloud
        .calls()
        .await
        .iter()
        .filter(|c| c.starts_with("acquire_token:"))
        .count();
    assert!(acquisitions >= 1);
}

#[tokio::test(start_paused = true)]
async fn full_batch_runs_both_samples_in_order() {
    let cloud = Arc::new(MockCloud::new());
    let provider: Arc<dyn SampleProvider> = Arc::new(provider_for(&cloud));

    run_all_samples(&[provider], &[], false).await;

    // each sample creates its own vault and leaves its own secret
    assert_eq!(cloud.vault_names().await.len(), 2);

    let calls = cloud.calls().await;
    let spn_set = calls
        .iter()
        .position(|c| c == "set_secret:auth-sample-secret")
        .expect("service principal sample ran");
    let cb_set = calls
        .iter()
        .position(|c| c == "set_secret:callback-sample-secret")
        .expect("callback sample ran");
    assert!(spn_set < cb_set, "samples run in discovery order");

    // setup happens once, before anything else
    let registers = calls
        .iter()
        .filter(|c| c.starts_with("register_provider:"))
        .count();
    assert_eq!(registers, 1);
}

#[tokio::test(start_paused = true)]
async fn requested_filter_limits_the_batch() {
    let cloud = Arc::new(MockCloud::new());
    let provider: Arc<dyn SampleProvider> = Arc::new(provider_for(&cloud));

    let requested = vec!["auth_using_token_callback".to_string()];
    run_all_samples(&[provider], &requested, false).await;

    assert_eq!(cloud.vault_names().await.len(), 1);
    let calls = cloud.calls().await;
    assert!(!calls.contains(&"set_secret:auth-sample-secret".to_string()));
    assert!(calls.contains(&"set_secret:callback-sample-secret".to_string()));
}

#[tokio::test(start_paused = true)]
async fn ci_mode_keeps_only_ci_safe_samples() {
    let cloud = Arc::new(MockCloud::new());
    let provider: Arc<dyn SampleProvider> = Arc::new(provider_for(&cloud));

    let selected = plan(&[provider.clone()], &[], true);
    assert_eq!(selected.len(), 1);
    assert_eq!(
        selected.groups[0].samples[0].name,
        "auth_using_service_principal_credentials"
    );

    run_all_samples(&[provider], &[], true).await;
    assert_eq!(cloud.vault_names().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failing_sample_does_not_stop_the_batch() {
    // every secret write is rejected, so both samples fail, but the batch
    // must still run to completion
    let mut cloud = MockCloud::new();
    cloud.set_error = Some("secret writes disabled".to_string());
    let cloud = Arc::new(cloud);
    let provider: Arc<dyn SampleProvider> = Arc::new(provider_for(&cloud));

    run_all_samples(&[provider], &[], false).await;

    // both samples attempted their writes despite both failing
    let attempts = cloud
        .calls()
        .await
        .iter()
        .filter(|c| c.starts_with("set_secret:"))
        .count();
    assert_eq!(attempts, 2);
}
