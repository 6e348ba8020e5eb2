//! `heladeria-auth` — flat-file credentials and role-gated permissions.
//!
//! Credentials are compared as opaque strings; there is no hashing at this
//! layer.

pub mod authorize;
pub mod config;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod permissions;
pub mod roles;

pub use authorize::{AuthzError, authorize};
pub use config::AuthConfig;
pub use credentials::{CreateOutcome, CredentialStore};
pub use error::AuthError;
pub use identity::Identity;
pub use permissions::Permission;
pub use roles::Role;
