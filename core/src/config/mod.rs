//! Minimal configuration module for toolzz core
//!
//! Only exports resolved data types and the credential store.
//! All discovery and loading logic is in CLI layer.

pub mod credentials;
pub mod types;

pub use credentials::{mask_secret, CredentialStore, API_KEY_ENTRY};
pub use types::{ResolvedClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
