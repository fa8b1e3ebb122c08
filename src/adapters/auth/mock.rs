//! Mock session validator for tests.
//!
//! # Example
//!
//! ```ignore
//! use tacticsphere::adapters::auth::MockSessionValidator;
//! use tacticsphere::domain::foundation::{CallerIdentity, CompanyId, Role, UserId};
//!
//! let validator = MockSessionValidator::new()
//!     .with_caller("admin-token", CallerIdentity::new(UserId::new(1), Role::Admin, None));
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, CallerIdentity};
use crate::ports::SessionValidator;

/// Maps fixed tokens to callers. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default, Clone)]
pub struct MockSessionValidator {
    tokens: HashMap<String, CallerIdentity>,
    force_error: Option<AuthError>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `token` as `caller`.
    pub fn with_caller(mut self, token: impl Into<String>, caller: CallerIdentity) -> Self {
        self.tokens.insert(token.into(), caller);
        self
    }

    /// Forces every validation to fail with `error`.
    pub fn with_error(mut self, error: AuthError) -> Self {
        self.force_error = Some(error);
        self
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        if let Some(error) = &self.force_error {
            return Err(error.clone());
        }
        self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}
