//! Identity guards and supporting modules.
//!
//! Requests carry a raw credential in `Authorization`. The credential is resolved
//! to an account id and the account is loaded from the store.
//!
//! ## Failure Codes
//!
//! - `NOT_AUTHENTICATED` (401): missing, blank or unverifiable credential.
//! - `USER_NOT_FOUND` (404): credential resolved but no account exists.
//!
//! Store faults are not part of this taxonomy. They surface as `500` and are
//! never downgraded to an anonymous caller by the optional guard.
//!
//! > **Warning:** [`PlaceholderResolver`] accepts any non-empty credential.

mod credential;
mod error;
mod guard;
mod resolver;
mod store;

pub use credential::extract_credential;
pub use error::{AuthError, AuthErrorCode};
pub use guard::{AuthGuard, AuthOutcome};
pub use resolver::{CredentialError, IdentityResolver, PLACEHOLDER_ACCOUNT_ID, PlaceholderResolver};
pub use store::{Account, AccountStore, PgAccountStore, StoreError};
