//! Session validation port for JWT token validation.
//!
//! Validates bearer tokens and yields the caller's identity: user id,
//! role and company affiliation. Implementations exist for HS256 JWTs
//! and for tests.

use async_trait::async_trait;

use crate::domain::foundation::{CallerIdentity, AuthError};

/// Validates access tokens and extracts the caller.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature, issuer and expiry
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::UnknownRole` for roles outside the platform table
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate an access token and return the caller.
    ///
    /// # Arguments
    ///
    /// * `token` - The raw JWT token (without "Bearer " prefix)
    ///
    /// # Returns
    ///
    /// * `Ok(CallerIdentity)` - Token is valid, caller extracted from claims
    /// * `Err(AuthError::InvalidToken)` - Token is malformed or signature invalid
    /// * `Err(AuthError::TokenExpired)` - Token signature valid but expired
    async fn validate(&self, token: &str) -> Result<CallerIdentity, AuthError>;
}
