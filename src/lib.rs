//! Vault samples - runnable demonstrations of key vault provisioning and
//! data-plane authentication.
//!
//! Each sample provisions a vault, waits for its endpoint to become
//! reachable, then authenticates to the data plane and round-trips a secret.
//! All cloud interaction happens through three client traits
//! ([`TokenEndpoint`], [`VaultManagement`], [`VaultDataPlane`]), so the
//! samples run unchanged against the bundled in-memory [`MockCloud`] or any
//! SDK-backed implementation of the same seams.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vault_samples::{
//!     run_all_samples, AuthenticationSample, MockCloud, SampleConfig, SampleProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SampleConfig::from_env();
//!     let cloud = Arc::new(MockCloud::new());
//!
//!     let provider: Arc<dyn SampleProvider> = Arc::new(AuthenticationSample::new(
//!         config,
//!         cloud.clone(),
//!         cloud.clone(),
//!         cloud.clone(),
//!     ));
//!
//!     // run everything; pass sample names to run a subset
//!     run_all_samples(&[provider], &[], false).await;
//! }
//! ```
//!
//! # Components
//!
//! - **Configuration** ([`SampleConfig`]): credentials and placement settings
//!   from the environment, with placeholder defaults and explicit overrides
//! - **Registry & runner** ([`SampleProvider`], [`run_all_samples`]):
//!   explicit sample registration, name filtering, sequential execution with
//!   per-sample fault isolation
//! - **Name generator** ([`names::generate_name`]): pseudo-unique
//!   `prefix-adjective-noun` display names
//! - **Readiness poller** ([`ReadinessPoller`]): bounded fixed-delay retry
//!   gate for freshly created endpoints
//! - **Credentials** ([`TokenCredential`]): service-principal exchange or a
//!   delegated token callback

pub mod clients;
pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod names;
pub mod poller;
pub mod runner;
pub mod samples;

pub use clients::{MockCloud, TokenEndpoint, VaultDataPlane, VaultManagement};
pub use config::SampleConfig;
pub use credentials::{
    AccessToken, CallbackCredential, ServicePrincipalCredential, TokenCredential,
};
pub use error::{Result, SampleError};
pub use model::{
    AccessPolicy, Permissions, SecretBundle, SecretItem, Sku, Vault, VaultCreateParameters,
    VaultProperties,
};
pub use poller::ReadinessPoller;
pub use runner::{plan, run_all_samples, SampleInfo, SamplePlan, SampleProvider};
pub use samples::AuthenticationSample;
