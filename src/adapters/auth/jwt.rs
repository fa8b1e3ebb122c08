//! HS256 bearer token adapter.
//!
//! Tokens are signed with a shared secret and carry the caller in three
//! custom claims:
//!
//! - `sub`: numeric user id
//! - `role`: `SYSTEM_ADMIN`, `ADMIN`, `ANALYST` or `USER`
//! - `company_id`: optional tenant id
//!
//! An optional `active: false` claim marks deactivated accounts so the
//! access policy can reject them.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, CallerIdentity, CompanyId, Role, UserId};
use crate::ports::SessionValidator;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    #[serde(default)]
    company_id: Option<i64>,
    #[serde(default)]
    active: Option<bool>,
    exp: i64,
}

pub struct JwtSessionValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(secret: &[u8], issuer: Option<&str>, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        }
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.expose_secret().as_bytes(),
            config.issuer.as_deref(),
            config.leeway_secs,
        )
    }

    fn caller_from(claims: Claims) -> Result<CallerIdentity, AuthError> {
        let user_id = claims.sub.parse::<UserId>().map_err(|_| {
            tracing::warn!(sub = %claims.sub, "non-numeric subject in token");
            AuthError::InvalidToken
        })?;
        let role = claims.role.parse::<Role>().map_err(|_| {
            tracing::warn!(role = %claims.role, "unknown role in token");
            AuthError::UnknownRole
        })?;
        let caller = CallerIdentity::new(user_id, role, claims.company_id.map(CompanyId::new));
        Ok(if claims.active == Some(false) {
            caller.deactivated()
        } else {
            caller
        })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                tracing::debug!("Token expired");
                AuthError::TokenExpired
            }
            ErrorKind::InvalidIssuer => {
                tracing::warn!("Invalid issuer in token");
                AuthError::InvalidToken
            }
            _ => {
                tracing::debug!("Token validation failed: {}", e);
                AuthError::InvalidToken
            }
        })?;
        Self::caller_from(data.claims)
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};

    const SECRET: &[u8] = b"test-signing-secret";

    fn sign(claims: Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn in_an_hour() -> i64 {
        (Utc::now() + Duration::hours(1)).timestamp()
    }

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(SECRET, None, 0)
    }

    #[tokio::test]
    async fn valid_token_yields_caller() {
        let token = sign(json!({ "sub": "42", "role": "ANALYST", "company_id": 7, "exp": in_an_hour() }));

        let caller = validator().validate(&token).await.unwrap();

        assert_eq!(caller.user_id, UserId::new(42));
        assert_eq!(caller.role, Role::Analyst);
        assert_eq!(caller.company_id, Some(CompanyId::new(7)));
        assert!(caller.active);
    }

    #[tokio::test]
    async fn inactive_claim_marks_caller_deactivated() {
        let token = sign(json!({ "sub": "1", "role": "USER", "active": false, "exp": in_an_hour() }));

        let caller = validator().validate(&token).await.unwrap();

        assert!(!caller.active);
        assert_eq!(caller.company_id, None);
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let past = (Utc::now() - Duration::hours(1)).timestamp();
        let token = sign(json!({ "sub": "1", "role": "ADMIN", "exp": past }));

        let result = validator().validate(&token).await;

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let token = sign(json!({ "sub": "1", "role": "ADMIN", "exp": in_an_hour() }));

        let result = JwtSessionValidator::new(b"another-secret", None, 0)
            .validate(&token)
            .await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let token = sign(json!({ "sub": "1", "role": "SUPERHERO", "exp": in_an_hour() }));

        let result = validator().validate(&token).await;

        assert!(matches!(result, Err(AuthError::UnknownRole)));
    }

    #[tokio::test]
    async fn issuer_is_checked_when_configured() {
        let validator = JwtSessionValidator::new(SECRET, Some("tacticsphere"), 0);
        let good = sign(json!({ "sub": "1", "role": "USER", "iss": "tacticsphere", "exp": in_an_hour() }));
        let bad = sign(json!({ "sub": "1", "role": "USER", "iss": "elsewhere", "exp": in_an_hour() }));

        assert!(validator.validate(&good).await.is_ok());
        assert!(matches!(validator.validate(&bad).await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        assert!(matches!(
            validator().validate("not.a.jwt").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
