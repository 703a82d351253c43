//! Credential to account-identifier resolution.

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Identifier every credential resolves to under [`PlaceholderResolver`].
pub const PLACEHOLDER_ACCOUNT_ID: Uuid = Uuid::from_u128(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential rejected: {0}")]
    Rejected(String),
}

/// Turns a non-empty raw credential into an account identifier.
///
/// Implementations verify the credential (signature, expiry, audience) and fail
/// with [`CredentialError`] when it cannot be trusted.
pub trait IdentityResolver: Send + Sync {
    /// # Errors
    /// Returns an error if the credential cannot be verified.
    fn resolve(&self, credential: &str) -> Result<Uuid, CredentialError>;
}

/// Stand-in resolver that performs no verification at all.
///
/// Every credential maps to [`PLACEHOLDER_ACCOUNT_ID`]. Never deploy this.
#[derive(Clone, Debug, Default)]
pub struct PlaceholderResolver;

impl IdentityResolver for PlaceholderResolver {
    fn resolve(&self, _credential: &str) -> Result<Uuid, CredentialError> {
        Ok(PLACEHOLDER_ACCOUNT_ID)
    }
}

impl PlaceholderResolver {
    #[must_use]
    pub fn new() -> Self {
        warn!("Placeholder identity resolver in use: credentials are NOT verified");
        Self
    }
}
