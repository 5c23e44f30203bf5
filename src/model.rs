//! Data types exchanged with the vault management and data-plane services.
//!
//! These mirror the wire shapes of the external service: an access policy
//! grants a single identity a set of key/secret/certificate permissions on a
//! vault, and secrets come back as bundles carrying their value plus metadata.

use crate::{Result, SampleError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operations an identity may perform on vault keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyPermission {
    Encrypt,
    Decrypt,
    WrapKey,
    UnwrapKey,
    Sign,
    Verify,
    Get,
    List,
    Create,
    Update,
    Import,
    Delete,
    Backup,
    Restore,
    Recover,
    Purge,
}

impl KeyPermission {
    /// Every key permission the service defines.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Encrypt,
            Self::Decrypt,
            Self::WrapKey,
            Self::UnwrapKey,
            Self::Sign,
            Self::Verify,
            Self::Get,
            Self::List,
            Self::Create,
            Self::Update,
            Self::Import,
            Self::Delete,
            Self::Backup,
            Self::Restore,
            Self::Recover,
            Self::Purge,
        ]
    }
}

/// Operations an identity may perform on vault secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretPermission {
    Get,
    List,
    Set,
    Delete,
    Backup,
    Restore,
    Recover,
    Purge,
}

impl SecretPermission {
    /// Every secret permission the service defines.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Get,
            Self::List,
            Self::Set,
            Self::Delete,
            Self::Backup,
            Self::Restore,
            Self::Recover,
            Self::Purge,
        ]
    }
}

/// Operations an identity may perform on vault certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CertificatePermission {
    Get,
    List,
    Create,
    Import,
    Update,
    Delete,
    ManageContacts,
    ManageIssuers,
    GetIssuers,
    ListIssuers,
    SetIssuers,
    DeleteIssuers,
    Recover,
    Purge,
}

impl CertificatePermission {
    /// Every certificate permission the service defines.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Get,
            Self::List,
            Self::Create,
            Self::Import,
            Self::Update,
            Self::Delete,
            Self::ManageContacts,
            Self::ManageIssuers,
            Self::GetIssuers,
            Self::ListIssuers,
            Self::SetIssuers,
            Self::DeleteIssuers,
            Self::Recover,
            Self::Purge,
        ]
    }
}

/// Permission sets granted by a single access policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    pub keys: Vec<KeyPermission>,
    pub secrets: Vec<SecretPermission>,
    pub certificates: Vec<CertificatePermission>,
}

impl Permissions {
    /// Full access to keys, secrets, and certificates.
    ///
    /// The samples grant this to the running service principal so every
    /// follow-up call against the new vault is authorized.
    pub fn all_access() -> Self {
        Self {
            keys: KeyPermission::all(),
            secrets: SecretPermission::all(),
            certificates: CertificatePermission::all(),
        }
    }
}

/// Grants one identity a set of permitted operations on a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Tenant the identity belongs to.
    pub tenant_id: String,
    /// Object id of the identity being granted access.
    pub object_id: String,
    /// Operations the identity may perform.
    pub permissions: Permissions,
}

/// Vault pricing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkuName {
    Standard,
    Premium,
}

/// Vault sku (family is always "A" for key vaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub family: String,
    pub name: SkuName,
}

impl Sku {
    /// The standard tier used by the samples.
    pub fn standard() -> Self {
        Self {
            family: "A".to_string(),
            name: SkuName::Standard,
        }
    }
}

/// Properties of a vault, supplied on creation and returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultProperties {
    /// Tenant that owns the vault.
    pub tenant_id: String,

    /// Pricing tier.
    pub sku: Sku,

    /// Identities granted access and what they may do.
    pub access_policies: Vec<AccessPolicy>,

    /// Data-plane endpoint. Filled in by the service; absent on create
    /// requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_uri: Option<String>,

    /// Whether VMs may retrieve certificates stored as secrets.
    pub enabled_for_deployment: bool,

    /// Whether the disk encryption service may retrieve secrets.
    pub enabled_for_disk_encryption: bool,

    /// Whether template deployments may retrieve secrets.
    pub enabled_for_template_deployment: bool,
}

impl VaultProperties {
    /// Creates vault properties with the deployment flags disabled.
    pub fn new(tenant_id: impl Into<String>, sku: Sku, access_policies: Vec<AccessPolicy>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            sku,
            access_policies,
            vault_uri: None,
            enabled_for_deployment: false,
            enabled_for_disk_encryption: false,
            enabled_for_template_deployment: false,
        }
    }
}

/// Request body for creating or updating a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultCreateParameters {
    /// Region the vault is created in.
    pub location: String,
    /// Vault properties, including the access policies.
    pub properties: VaultProperties,
}

/// A provisioned vault as returned by the management service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    /// Service-assigned resource id.
    pub id: String,
    /// Vault name.
    pub name: String,
    /// Region the vault lives in.
    pub location: String,
    /// Vault properties, with `vault_uri` populated.
    pub properties: VaultProperties,
}

impl Vault {
    /// The vault's data-plane endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::Service`] if the service handed back a vault
    /// without an endpoint, which indicates a malformed response.
    pub fn vault_uri(&self) -> Result<&str> {
        self.properties
            .vault_uri
            .as_deref()
            .ok_or_else(|| SampleError::Service(format!("vault {} has no uri", self.name)))
    }
}

/// Management metadata attached to a stored secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretAttributes {
    /// Whether the secret may be retrieved.
    pub enabled: bool,

    /// When the secret version was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    /// When the secret version was last updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

/// A stored secret: its value plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretBundle {
    /// Versioned secret identifier, `{vault_uri}secrets/{name}/{version}`.
    pub id: String,
    /// The secret value.
    pub value: String,
    /// Management metadata.
    pub attributes: SecretAttributes,
}

/// A list entry for a secret; carries no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretItem {
    /// Unversioned secret identifier, `{vault_uri}secrets/{name}`.
    pub id: String,
    /// Management metadata of the latest version.
    pub attributes: SecretAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_access_covers_every_permission() {
        let permissions = Permissions::all_access();
        assert_eq!(permissions.keys.len(), 16);
        assert_eq!(permissions.secrets.len(), 8);
        assert_eq!(permissions.certificates.len(), 14);
    }

    #[test]
    fn test_permission_wire_names() {
        let json = serde_json::to_string(&KeyPermission::WrapKey).unwrap();
        assert_eq!(json, "\"wrapKey\"");

        let json = serde_json::to_string(&SecretPermission::Get).unwrap();
        assert_eq!(json, "\"get\"");

        let json = serde_json::to_string(&SkuName::Standard).unwrap();
        assert_eq!(json, "\"standard\"");
    }

    #[test]
    fn test_vault_uri_missing_is_an_error() {
        let vault = Vault {
            id: "/resource-groups/g/vaults/v".to_string(),
            name: "v".to_string(),
            location: "westus".to_string(),
            properties: VaultProperties::new("tenant", Sku::standard(), Vec::new()),
        };

        assert!(matches!(vault.vault_uri(), Err(SampleError::Service(_))));
    }

    #[test]
    fn test_create_parameters_round_trip() {
        let policy = AccessPolicy {
            tenant_id: "tenant".to_string(),
            object_id: "oid".to_string(),
            permissions: Permissions::all_access(),
        };
        let params = VaultCreateParameters {
            location: "westus".to_string(),
            properties: VaultProperties::new("tenant", Sku::standard(), vec![policy]),
        };

        let json = serde_json::to_string(&params).unwrap();
        let decoded: VaultCreateParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, decoded);
        // vault_uri is service-assigned and must not appear in requests
        assert!(!json.contains("vault_uri"));
    }
}
