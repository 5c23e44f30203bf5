//! Sample providers.

pub mod authentication;

pub use authentication::AuthenticationSample;
