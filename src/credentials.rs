//! Credential providers for data-plane authentication.
//!
//! The data-plane client asks its attached [`TokenCredential`] for a fresh
//! token whenever it needs one. Two variants are provided: a direct
//! service-principal exchange and a delegated callback supplied by the caller.

use crate::clients::TokenEndpoint;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A bearer token issued by the identity service.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Token scheme, normally `Bearer`.
    pub token_type: String,
    /// The opaque token value.
    pub token: String,
    /// When the token stops being accepted, if known.
    pub expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a non-expiring bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token_type: "Bearer".to_string(),
            token: token.into(),
            expires_on: None,
        }
    }

    /// Formats the token for an `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

/// Supplies a current token on demand.
///
/// Implementations must be `Send + Sync`; the data-plane client holds the
/// credential behind an `Arc` and may call it from any task.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Produces a token valid for the data plane right now.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::Authentication`](crate::SampleError::Authentication)
    /// if the exchange is rejected.
    async fn get_token(&self) -> Result<AccessToken>;
}

/// Non-interactive credential: exchanges a client id, secret, and tenant for
/// a token on every request.
pub struct ServicePrincipalCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    endpoint: Arc<dyn TokenEndpoint>,
}

impl ServicePrincipalCredential {
    /// Creates a credential bound to the given identity endpoint.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        endpoint: Arc<dyn TokenEndpoint>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            endpoint,
        }
    }
}

#[async_trait]
impl TokenCredential for ServicePrincipalCredential {
    async fn get_token(&self) -> Result<AccessToken> {
        self.endpoint
            .acquire_token(&self.tenant_id, &self.client_id, &self.client_secret)
            .await
    }
}

/// Callback signature for [`CallbackCredential`]: returns a
/// (token-type, token-value) pair.
pub type TokenCallback = dyn Fn() -> Result<(String, String)> + Send + Sync;

/// Delegated credential: invokes a caller-supplied callback whenever the
/// client needs a fresh token.
pub struct CallbackCredential {
    callback: Arc<TokenCallback>,
}

impl CallbackCredential {
    /// Wraps a callback producing (token-type, token-value) pairs.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() -> Result<(String, String)> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }
}

#[async_trait]
impl TokenCredential for CallbackCredential {
    async fn get_token(&self) -> Result<AccessToken> {
        let (token_type, token) = (self.callback)()?;
        Ok(AccessToken {
            token_type,
            token,
            expires_on: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleError;

    #[test]
    fn test_bearer_header_value() {
        let token = AccessToken::bearer("abc123");
        assert_eq!(token.header_value(), "Bearer abc123");
        assert!(token.expires_on.is_none());
    }

    #[tokio::test]
    async fn test_callback_credential_returns_pair() {
        let credential =
            CallbackCredential::new(|| Ok(("Bearer".to_string(), "cb-token".to_string())));

        let token = credential.get_token().await.unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.token, "cb-token");
    }

    #[tokio::test]
    async fn test_callback_credential_propagates_failure() {
        let credential = CallbackCredential::new(|| {
            Err(SampleError::Authentication("token source offline".to_string()))
        });

        let result = credential.get_token().await;
        assert!(matches!(result, Err(SampleError::Authentication(_))));
    }
}
