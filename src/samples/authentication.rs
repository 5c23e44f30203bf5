//! Samples demonstrating the two data-plane authentication flows.

use crate::clients::{TokenEndpoint, VaultDataPlane, VaultManagement};
use crate::config::SampleConfig;
use crate::credentials::{CallbackCredential, ServicePrincipalCredential, TokenCredential};
use crate::model::{
    AccessPolicy, Permissions, Sku, Vault, VaultCreateParameters, VaultProperties,
};
use crate::names::generate_name;
use crate::poller::ReadinessPoller;
use crate::runner::{SampleInfo, SampleProvider};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Authenticates with service principal credentials exchanged on demand.
pub const AUTH_SERVICE_PRINCIPAL: &str = "auth_using_service_principal_credentials";

/// Authenticates with a caller-supplied token callback.
pub const AUTH_TOKEN_CALLBACK: &str = "auth_using_token_callback";

/// Resource provider namespace the samples depend on.
const KEY_VAULT_NAMESPACE: &str = "Microsoft.KeyVault";

/// Samples that demonstrate authenticating to the vault data plane.
///
/// Each sample provisions its own vault, waits for the endpoint to become
/// reachable, then proves the credential works by writing and reading back a
/// secret.
pub struct AuthenticationSample {
    config: SampleConfig,
    tokens: Arc<dyn TokenEndpoint>,
    mgmt: Arc<dyn VaultManagement>,
    data: Arc<dyn VaultDataPlane>,
    poller: ReadinessPoller,
}

impl AuthenticationSample {
    /// Creates the provider with the given configuration and clients.
    pub fn new(
        config: SampleConfig,
        tokens: Arc<dyn TokenEndpoint>,
        mgmt: Arc<dyn VaultManagement>,
        data: Arc<dyn VaultDataPlane>,
    ) -> Self {
        Self {
            config,
            tokens,
            mgmt,
            data,
            poller: ReadinessPoller::new(),
        }
    }

    /// Replaces the readiness poller (shorter waits for demos and tests).
    pub fn with_poller(mut self, poller: ReadinessPoller) -> Self {
        self.poller = poller;
        self
    }

    fn service_principal_credential(&self) -> Arc<dyn TokenCredential> {
        Arc::new(ServicePrincipalCredential::new(
            &self.config.tenant_id,
            &self.config.client_id,
            &self.config.client_secret,
            Arc::clone(&self.tokens),
        ))
    }

    /// Creates a vault with a unique name, granting the configured service
    /// principal full key, secret, and certificate permissions, and gates on
    /// the data-plane endpoint becoming reachable.
    async fn create_vault(&self) -> Result<Vault> {
        let vault_name = generate_name("vault");

        let policy = AccessPolicy {
            tenant_id: self.config.tenant_id.clone(),
            object_id: self.config.client_oid.clone(),
            permissions: Permissions::all_access(),
        };

        let mut properties =
            VaultProperties::new(&self.config.tenant_id, Sku::standard(), vec![policy]);
        properties.enabled_for_deployment = true;
        properties.enabled_for_disk_encryption = true;
        properties.enabled_for_template_deployment = true;

        let params = VaultCreateParameters {
            location: self.config.location.clone(),
            properties,
        };

        info!(vault = %vault_name, "creating vault");
        let vault = self
            .mgmt
            .create_or_update_vault(&self.config.group_name, &vault_name, params)
            .await?;

        // the vault's DNS entry may not have propagated yet
        let uri = vault.vault_uri()?.to_string();
        self.poller
            .wait_until_ready(|| self.data.list_secrets(&uri))
            .await?;

        info!(vault = %vault_name, uri = %uri, "vault created");
        Ok(vault)
    }

    async fn auth_using_service_principal_credentials(&self) -> Result<()> {
        let vault = self.create_vault().await?;
        let uri = vault.vault_uri()?;

        self.data
            .authenticate(self.service_principal_credential())
            .await?;

        self.data
            .set_secret(uri, "auth-sample-secret", "vault is authenticated")
            .await?;
        let bundle = self.data.get_secret(uri, "auth-sample-secret", "").await?;

        info!(
            bundle = %serde_json::to_string_pretty(&bundle)?,
            "retrieved secret with service principal credentials"
        );
        Ok(())
    }

    async fn auth_using_token_callback(&self) -> Result<()> {
        let vault = self.create_vault().await?;
        let uri = vault.vault_uri()?;

        // the data plane invokes this callback whenever it needs a token
        let token = self
            .tokens
            .acquire_token(
                &self.config.tenant_id,
                &self.config.client_id,
                &self.config.client_secret,
            )
            .await?;
        let credential = CallbackCredential::new(move || {
            Ok((token.token_type.clone(), token.token.clone()))
        });

        self.data.authenticate(Arc::new(credential)).await?;

        self.data
            .set_secret(uri, "callback-sample-secret", "vault is authenticated")
            .await?;
        let bundle = self
            .data
            .get_secret(uri, "callback-sample-secret", "")
            .await?;

        info!(
            bundle = %serde_json::to_string_pretty(&bundle)?,
            "retrieved secret with a token callback"
        );
        Ok(())
    }
}

#[async_trait]
impl SampleProvider for AuthenticationSample {
    fn name(&self) -> &str {
        "authentication"
    }

    fn samples(&self) -> Vec<SampleInfo> {
        vec![
            SampleInfo {
                name: AUTH_SERVICE_PRINCIPAL,
                description: "authenticates to the vault data plane with service principal credentials",
                ci: true,
            },
            SampleInfo {
                name: AUTH_TOKEN_CALLBACK,
                description: "authenticates to the vault data plane with a token callback",
                ci: false,
            },
        ]
    }

    async fn setup(&self) -> Result<()> {
        self.mgmt.register_provider(KEY_VAULT_NAMESPACE).await?;
        self.mgmt
            .ensure_resource_group(&self.config.group_name, &self.config.location)
            .await?;
        self.data
            .authenticate(self.service_principal_credential())
            .await?;
        Ok(())
    }

    async fn run_sample(&self, name: &str) -> Result<()> {
        match name {
            AUTH_SERVICE_PRINCIPAL => self.auth_using_service_principal_credentials().await,
            AUTH_TOKEN_CALLBACK => self.auth_using_token_callback().await,
            other => Err(crate::SampleError::UnknownSample(other.to_string())),
        }
    }
}
