//! Client traits for the external cloud collaborators.
//!
//! The samples only ever talk to the cloud through these three seams: the
//! identity service that issues tokens, the management plane that provisions
//! resource groups and vaults, and the vault data plane that stores secrets.
//! The in-memory [`MockCloud`] implements all three for offline runs and
//! tests; wiring the official SDKs behind the same traits is left out of
//! scope.

pub mod mock;

pub use mock::MockCloud;

use crate::credentials::{AccessToken, TokenCredential};
use crate::model::{SecretBundle, SecretItem, Vault, VaultCreateParameters};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Identity service issuing bearer tokens (collaborator A).
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchanges service-principal credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::Authentication`](crate::SampleError::Authentication)
    /// if the exchange is rejected.
    async fn acquire_token(
        &self,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken>;
}

/// Resource and vault management plane (collaborator B).
#[async_trait]
pub trait VaultManagement: Send + Sync {
    /// Registers a resource provider namespace with the subscription.
    ///
    /// Idempotent; registering an already-registered namespace succeeds.
    async fn register_provider(&self, namespace: &str) -> Result<()>;

    /// Creates the resource group if it does not already exist.
    async fn ensure_resource_group(&self, name: &str, location: &str) -> Result<()>;

    /// Creates or updates a vault and returns it with its endpoint assigned.
    ///
    /// The returned vault is addressable through the management plane
    /// immediately, but its data-plane endpoint may not resolve yet; gate on
    /// the [`ReadinessPoller`](crate::ReadinessPoller) before using it.
    ///
    /// # Errors
    ///
    /// - [`SampleError::InvalidName`](crate::SampleError::InvalidName):
    ///   the vault name violates the service naming rules
    /// - [`SampleError::GroupNotFound`](crate::SampleError::GroupNotFound):
    ///   the target resource group does not exist
    async fn create_or_update_vault(
        &self,
        group: &str,
        name: &str,
        params: VaultCreateParameters,
    ) -> Result<Vault>;
}

/// Vault data plane for secret storage (collaborator C).
///
/// A credential must be attached with [`authenticate`](Self::authenticate)
/// before any secret operation; the client asks it for a fresh token on
/// every request.
#[async_trait]
pub trait VaultDataPlane: Send + Sync {
    /// Attaches the credential used for subsequent secret operations.
    async fn authenticate(&self, credential: Arc<dyn TokenCredential>) -> Result<()>;

    /// Stores a secret value, creating a new version.
    async fn set_secret(&self, vault_uri: &str, name: &str, value: &str) -> Result<SecretBundle>;

    /// Retrieves a secret by name. An empty `version` selects the latest.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::SecretNotFound`](crate::SampleError::SecretNotFound)
    /// if the name or version does not exist.
    async fn get_secret(&self, vault_uri: &str, name: &str, version: &str)
        -> Result<SecretBundle>;

    /// Lists the secrets in a vault.
    ///
    /// Doubles as the liveness probe: a vault whose DNS entry has not
    /// propagated fails this call with the connectivity error class.
    async fn list_secrets(&self, vault_uri: &str) -> Result<Vec<SecretItem>>;
}
