//! Authentication types for the domain layer.
//!
//! A `CallerIdentity` is what the `SessionValidator` port produces after a
//! bearer token has been verified. It carries only what the access rules
//! need: the role and, for tenant-bound users, the company.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{CompanyId, UserId, ValidationError};

/// Platform role of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Operates the whole platform across tenants.
    SystemAdmin,
    Admin,
    Analyst,
    /// Tenant-bound user, restricted to its own company.
    User,
}

impl Role {
    /// Wire name stored in tokens and the users table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "SYSTEM_ADMIN",
            Role::Admin => "ADMIN",
            Role::Analyst => "ANALYST",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SYSTEM_ADMIN" => Ok(Role::SystemAdmin),
            "ADMIN" => Ok(Role::Admin),
            "ANALYST" => Ok(Role::Analyst),
            "USER" => Ok(Role::User),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Authenticated caller extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: UserId,
    pub role: Role,
    /// Company the caller belongs to, if any.
    pub company_id: Option<CompanyId>,
    pub active: bool,
}

impl CallerIdentity {
    /// Creates an active caller.
    pub fn new(user_id: UserId, role: Role, company_id: Option<CompanyId>) -> Self {
        Self {
            user_id,
            role,
            company_id,
            active: true,
        }
    }

    /// Marks the caller as deactivated.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// The token names a role this platform does not know.
    #[error("Unknown role in token")]
    UnknownRole,

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the caller should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UnknownRole
        )
    }
}
