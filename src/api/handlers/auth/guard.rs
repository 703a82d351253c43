//! Required and optional identity guards.
//!
//! Flow Overview: read the raw credential, resolve it to an account id, then
//! load the account. The first failing step decides the outcome; at most one
//! store query runs per call.

use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::{debug, error};

use super::{
    credential::extract_credential,
    error::AuthError,
    resolver::IdentityResolver,
    store::{Account, AccountStore, StoreError},
};
use crate::api::handlers::error::Locale;

/// Result of identity resolution for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(Account),
    Unauthenticated(AuthError),
}

impl AuthOutcome {
    /// Collapse into the optional form: any guard failure becomes `None`.
    #[must_use]
    pub fn into_account(self) -> Option<Account> {
        match self {
            Self::Authenticated(account) => Some(account),
            Self::Unauthenticated(_) => None,
        }
    }

    /// # Errors
    /// Returns the guard failure when the caller is not authenticated.
    pub fn into_result(self) -> Result<Account, AuthError> {
        match self {
            Self::Authenticated(account) => Ok(account),
            Self::Unauthenticated(err) => Err(err),
        }
    }
}

/// Composes credential extraction, identity resolution and the account store.
#[derive(Clone)]
pub struct AuthGuard {
    resolver: Arc<dyn IdentityResolver>,
    store: Arc<dyn AccountStore>,
}

impl AuthGuard {
    #[must_use]
    pub fn new(resolver: Arc<dyn IdentityResolver>, store: Arc<dyn AccountStore>) -> Self {
        Self { resolver, store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    /// Required guard.
    ///
    /// Guard failures come back as `Ok(AuthOutcome::Unauthenticated(_))`;
    /// `Err` is reserved for store faults.
    ///
    /// # Errors
    /// Returns an error if the account store cannot be queried.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthOutcome, StoreError> {
        let locale = Locale::from_headers(headers);

        let Some(credential) = extract_credential(headers) else {
            debug!("No credential presented");
            return Ok(AuthOutcome::Unauthenticated(AuthError::not_authenticated(
                locale,
            )));
        };

        let account_id = match self.resolver.resolve(&credential) {
            Ok(account_id) => account_id,
            Err(err) => {
                debug!("Credential verification failed: {err}");
                return Ok(AuthOutcome::Unauthenticated(AuthError::not_authenticated(
                    locale,
                )));
            }
        };

        match self.store.find_account(account_id).await {
            Ok(Some(account)) => Ok(AuthOutcome::Authenticated(account)),
            Ok(None) => {
                debug!(%account_id, "Credential resolved to unknown account");
                Ok(AuthOutcome::Unauthenticated(AuthError::user_not_found(
                    locale,
                )))
            }
            Err(err) => {
                error!("Failed to lookup account {account_id}: {err}");
                Err(err)
            }
        }
    }

    /// Optional guard: anonymous callers yield `Ok(None)` instead of an error.
    ///
    /// Store faults are not guard failures and still propagate.
    ///
    /// # Errors
    /// Returns an error if the account store cannot be queried.
    pub async fn authenticate_optional(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<Account>, StoreError> {
        self.authenticate(headers)
            .await
            .map(AuthOutcome::into_account)
    }
}
