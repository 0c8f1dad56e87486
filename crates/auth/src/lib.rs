//! `webstore-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns
//! credentials into a [`Principal`] and a principal into an [`AccessScope`],
//! and nothing else in the system is allowed to interpret roles.

pub mod google;
pub mod principal;
pub mod role;
pub mod scope;
pub mod session;

pub use google::{GoogleApiVerifier, GoogleTokenVerifier, VerifiedIdentity, VerifyError};
pub use principal::{Caller, Principal};
pub use role::Role;
pub use scope::AccessScope;
pub use session::{SessionClaims, TokenError, TokenService};
