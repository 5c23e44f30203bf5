//! In-memory stand-in for the cloud collaborators.
//!
//! Implements all three client traits with in-memory state, error injection,
//! and an ordered call log, so the samples and their tests can run without a
//! subscription. Connectivity failures can be injected on `list_secrets` to
//! exercise the readiness poller the way a propagating DNS entry would.

use crate::clients::{TokenEndpoint, VaultDataPlane, VaultManagement};
use crate::credentials::{AccessToken, TokenCredential};
use crate::model::{SecretAttributes, SecretBundle, SecretItem, Vault, VaultCreateParameters};
use crate::names::validate_name;
use crate::{Result, SampleError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct CloudState {
    providers: Vec<String>,
    groups: HashMap<String, String>,
    vaults: HashMap<String, Vault>,
    // vault_uri -> secret name -> versions, oldest first
    secrets: HashMap<String, HashMap<String, Vec<SecretBundle>>>,
    calls: Vec<String>,
    connect_failures_left: u32,
}

/// In-memory cloud implementing [`TokenEndpoint`], [`VaultManagement`], and
/// [`VaultDataPlane`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vault_samples::{MockCloud, ServicePrincipalCredential, VaultDataPlane};
///
/// #[tokio::main]
/// async fn main() -> vault_samples::Result<()> {
///     let cloud = Arc::new(MockCloud::new());
///     let credential = ServicePrincipalCredential::new(
///         "tenant", "client", "secret", cloud.clone(),
///     );
///     cloud.authenticate(Arc::new(credential)).await?;
///     Ok(())
/// }
/// ```
pub struct MockCloud {
    state: RwLock<CloudState>,
    credential: RwLock<Option<Arc<dyn TokenCredential>>>,

    /// Error message to return from `acquire_token`
    pub auth_error: Option<String>,
    /// Error message to return from `create_or_update_vault`
    pub create_vault_error: Option<String>,
    /// Error message to return from `set_secret`
    pub set_error: Option<String>,
    /// Error message to return from `get_secret`
    pub get_error: Option<String>,
}

impl MockCloud {
    /// Creates an empty mock cloud.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CloudState::default()),
            credential: RwLock::new(None),
            auth_error: None,
            create_vault_error: None,
            set_error: None,
            get_error: None,
        }
    }

    /// Makes the next `count` calls to `list_secrets` fail with the
    /// connectivity error class, simulating a vault whose DNS entry is still
    /// propagating.
    pub fn with_connect_failures(mut self, count: u32) -> Self {
        self.state.get_mut().connect_failures_left = count;
        self
    }

    /// The ordered log of every call received, as `operation:detail` strings.
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    /// Names of the vaults created so far, in creation order.
    pub async fn vault_names(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut names: Vec<_> = state.vaults.keys().cloned().collect();
        names.sort();
        names
    }

    /// Looks up a created vault by name.
    pub async fn vault(&self, name: &str) -> Option<Vault> {
        self.state.read().await.vaults.get(name).cloned()
    }

    /// The latest value of a secret, if it exists.
    pub async fn secret_value(&self, vault_uri: &str, name: &str) -> Option<String> {
        let state = self.state.read().await;
        let versions = state.secrets.get(vault_uri)?.get(name)?;
        versions.last().map(|bundle| bundle.value.clone())
    }

    async fn record(&self, call: impl Into<String>) {
        self.state.write().await.calls.push(call.into());
    }

    /// Checks the attached credential by asking it for a fresh token, the
    /// way the real data plane challenges each request.
    async fn ensure_authorized(&self, operation: &str) -> Result<()> {
        let credential = self.credential.read().await.clone();
        let credential = credential.ok_or_else(|| {
            SampleError::Authentication(format!("{operation}: no credential attached"))
        })?;

        let token = credential.get_token().await?;
        if token.token_type != "Bearer" || token.token.is_empty() {
            return Err(SampleError::Authentication(format!(
                "{operation}: token rejected"
            )));
        }
        Ok(())
    }
}

impl Default for MockCloud {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenEndpoint for MockCloud {
    async fn acquire_token(
        &self,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken> {
        self.record(format!("acquire_token:{client_id}")).await;

        if let Some(ref message) = self.auth_error {
            return Err(SampleError::Authentication(message.clone()));
        }
        if tenant_id.is_empty() || client_id.is_empty() || client_secret.is_empty() {
            return Err(SampleError::Authentication(
                "tenant, client id, and secret are all required".to_string(),
            ));
        }

        Ok(AccessToken {
            token_type: "Bearer".to_string(),
            token: format!("spn-{}", Uuid::new_v4().simple()),
            expires_on: Some(Utc::now() + chrono::Duration::hours(1)),
        })
    }
}

#[async_trait]
impl VaultManagement for MockCloud {
    async fn register_provider(&self, namespace: &str) -> Result<()> {
        self.record(format!("register_provider:{namespace}")).await;

        let mut state = self.state.write().await;
        if !state.providers.iter().any(|p| p == namespace) {
            state.providers.push(namespace.to_string());
        }
        Ok(())
    }

    async fn ensure_resource_group(&self, name: &str, location: &str) -> Result<()> {
        self.record(format!("ensure_resource_group:{name}")).await;

        let mut state = self.state.write().await;
        state
            .groups
            .entry(name.to_string())
            .or_insert_with(|| location.to_string());
        Ok(())
    }

    async fn create_or_update_vault(
        &self,
        group: &str,
        name: &str,
        params: VaultCreateParameters,
    ) -> Result<Vault> {
        self.record(format!("create_vault:{name}")).await;

        if let Some(ref message) = self.create_vault_error {
            return Err(SampleError::Service(message.clone()));
        }
        validate_name(name)?;

        let mut state = self.state.write().await;
        if !state.groups.contains_key(group) {
            return Err(SampleError::GroupNotFound(group.to_string()));
        }

        let vault_uri = format!("https://{name}.vault.example.net/");
        let mut properties = params.properties;
        properties.vault_uri = Some(vault_uri.clone());

        let vault = Vault {
            id: format!("/resource-groups/{group}/vaults/{name}"),
            name: name.to_string(),
            location: params.location,
            properties,
        };

        state.vaults.insert(name.to_string(), vault.clone());
        state.secrets.entry(vault_uri).or_default();
        Ok(vault)
    }
}

#[async_trait]
impl VaultDataPlane for MockCloud {
    async fn authenticate(&self, credential: Arc<dyn TokenCredential>) -> Result<()> {
        self.record("authenticate").await;
        *self.credential.write().await = Some(credential);
        Ok(())
    }

    async fn set_secret(&self, vault_uri: &str, name: &str, value: &str) -> Result<SecretBundle> {
        self.ensure_authorized("set_secret").await?;
        self.record(format!("set_secret:{name}")).await;

        if let Some(ref message) = self.set_error {
            return Err(SampleError::Service(message.clone()));
        }

        let mut state = self.state.write().await;
        let secrets = state
            .secrets
            .get_mut(vault_uri)
            .ok_or_else(|| SampleError::Connection(format!("no route to {vault_uri}")))?;

        let now = Utc::now();
        let bundle = SecretBundle {
            id: format!("{vault_uri}secrets/{name}/{}", Uuid::new_v4().simple()),
            value: value.to_string(),
            attributes: SecretAttributes {
                enabled: true,
                created: Some(now),
                updated: Some(now),
            },
        };

        secrets
            .entry(name.to_string())
            .or_default()
            .push(bundle.clone());
        Ok(bundle)
    }

    async fn get_secret(
        &self,
        vault_uri: &str,
        name: &str,
        version: &str,
    ) -> Result<SecretBundle> {
        self.ensure_authorized("get_secret").await?;
        self.record(format!("get_secret:{name}")).await;

        if let Some(ref message) = self.get_error {
            return Err(SampleError::Service(message.clone()));
        }

        let state = self.state.read().await;
        let versions = state
            .secrets
            .get(vault_uri)
            .ok_or_else(|| SampleError::Connection(format!("no route to {vault_uri}")))?
            .get(name)
            .ok_or_else(|| SampleError::SecretNotFound(name.to_string()))?;

        let bundle = if version.is_empty() {
            versions.last()
        } else {
            versions.iter().find(|b| b.id.ends_with(version))
        };

        bundle
            .cloned()
            .ok_or_else(|| SampleError::SecretNotFound(format!("{name}/{version}")))
    }

    async fn list_secrets(&self, vault_uri: &str) -> Result<Vec<SecretItem>> {
        self.record("list_secrets").await;

        {
            let mut state = self.state.write().await;
            if state.connect_failures_left > 0 {
                state.connect_failures_left -= 1;
                return Err(SampleError::Connection(format!(
                    "name resolution failed for {vault_uri}"
                )));
            }
        }

        self.ensure_authorized("list_secrets").await?;

        let state = self.state.read().await;
        let secrets = state
            .secrets
            .get(vault_uri)
            .ok_or_else(|| SampleError::Connection(format!("no route to {vault_uri}")))?;

        let mut items: Vec<_> = secrets
            .iter()
            .map(|(name, versions)| SecretItem {
                id: format!("{vault_uri}secrets/{name}"),
                attributes: versions
                    .last()
                    .map(|b| b.attributes.clone())
                    .unwrap_or(SecretAttributes {
                        enabled: true,
                        created: None,
                        updated: None,
                    }),
            })
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }
}
