//! Configuration settings for the key vault samples.
//!
//! Every field can be supplied through an environment variable, falls back to
//! a documented placeholder default, and can be overridden explicitly (the CLI
//! maps its flags onto the `with_*` builders). An override always wins over
//! the environment; the environment always wins over the placeholder.

/// Environment variable for the subscription id.
pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
/// Environment variable for the service principal's application id.
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
/// Environment variable for the service principal's object id.
pub const ENV_CLIENT_OID: &str = "AZURE_CLIENT_OID";
/// Environment variable for the tenant id.
pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
/// Environment variable for the service principal's secret.
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
/// Environment variable for the target region.
pub const ENV_LOCATION: &str = "AZURE_LOCATION";
/// Environment variable for the resource group name.
pub const ENV_RESOURCE_GROUP: &str = "AZURE_RESOURCE_GROUP";

const DEFAULT_SUBSCRIPTION_ID: &str = "11111111-1111-1111-1111-111111111111";
const DEFAULT_CLIENT_ID: &str = "22222222-2222-2222-2222-222222222222";
const DEFAULT_CLIENT_OID: &str = "33333333-3333-3333-3333-333333333333";
const DEFAULT_TENANT_ID: &str = "44444444-4444-4444-4444-444444444444";
const DEFAULT_CLIENT_SECRET: &str = "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz=";
const DEFAULT_LOCATION: &str = "westus";
const DEFAULT_GROUP_NAME: &str = "azure-sample-group";

/// Credential and placement settings shared by all sample providers.
///
/// Constructed once per run and read-only afterwards. The placeholder
/// defaults are non-functional stand-ins; a run against a real subscription
/// needs every credential field set through the environment or the CLI.
///
/// # Example
///
/// ```
/// use vault_samples::SampleConfig;
///
/// let config = SampleConfig::from_env()
///     .with_location("eastus")
///     .with_group_name("demo-group");
///
/// assert_eq!(config.location, "eastus");
/// ```
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Subscription in which resources are created.
    pub subscription_id: String,

    /// Application id of the service principal running the samples.
    pub client_id: String,

    /// Object id of the service principal, granted vault access.
    pub client_oid: String,

    /// Directory tenant the service principal lives in.
    pub tenant_id: String,

    /// Authentication secret of the service principal.
    pub client_secret: String,

    /// Region in which resources are created.
    pub location: String,

    /// Resource group holding the sample vaults.
    pub group_name: String,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl SampleConfig {
    /// Builds a configuration from the environment, falling back to the
    /// placeholder defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            subscription_id: env_or(ENV_SUBSCRIPTION_ID, DEFAULT_SUBSCRIPTION_ID),
            client_id: env_or(ENV_CLIENT_ID, DEFAULT_CLIENT_ID),
            client_oid: env_or(ENV_CLIENT_OID, DEFAULT_CLIENT_OID),
            tenant_id: env_or(ENV_TENANT_ID, DEFAULT_TENANT_ID),
            client_secret: env_or(ENV_CLIENT_SECRET, DEFAULT_CLIENT_SECRET),
            location: env_or(ENV_LOCATION, DEFAULT_LOCATION),
            group_name: env_or(ENV_RESOURCE_GROUP, DEFAULT_GROUP_NAME),
        }
    }

    /// Overrides the subscription id.
    pub fn with_subscription_id(mut self, id: impl Into<String>) -> Self {
        self.subscription_id = id.into();
        self
    }

    /// Overrides the service principal's application id.
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Overrides the service principal's object id.
    pub fn with_client_oid(mut self, oid: impl Into<String>) -> Self {
        self.client_oid = oid.into();
        self
    }

    /// Overrides the tenant id.
    pub fn with_tenant_id(mut self, id: impl Into<String>) -> Self {
        self.tenant_id = id.into();
        self
    }

    /// Overrides the service principal's secret.
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = secret.into();
        self
    }

    /// Overrides the target region.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Overrides the resource group name.
    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = name.into();
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_defaults() {
        std::env::remove_var(ENV_LOCATION);
        std::env::remove_var(ENV_RESOURCE_GROUP);

        let config = SampleConfig::from_env();
        assert_eq!(config.location, "westus");
        assert_eq!(config.group_name, "azure-sample-group");
    }

    #[test]
    fn test_override_beats_environment() {
        // only this test touches the client id variable, so parallel test
        // execution never races on it
        std::env::set_var(ENV_CLIENT_ID, "from-environment");

        let config = SampleConfig::from_env();
        assert_eq!(config.client_id, "from-environment");

        let config = SampleConfig::from_env().with_client_id("explicit-override");
        assert_eq!(config.client_id, "explicit-override");

        std::env::remove_var(ENV_CLIENT_ID);
    }

    #[test]
    fn test_builder_overrides() {
        let config = SampleConfig::from_env()
            .with_subscription_id("sub")
            .with_client_id("client")
            .with_client_oid("oid")
            .with_tenant_id("tenant")
            .with_client_secret("secret")
            .with_location("eastus2")
            .with_group_name("test-group");

        assert_eq!(config.subscription_id, "sub");
        assert_eq!(config.client_id, "client");
        assert_eq!(config.client_oid, "oid");
        assert_eq!(config.tenant_id, "tenant");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.location, "eastus2");
        assert_eq!(config.group_name, "test-group");
    }
}
