//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Bearer token verification settings (HS256).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared signing secret
    pub jwt_secret: SecretString,

    /// Expected `iss` claim; unchecked when absent
    pub issuer: Option<String>,

    /// Clock skew tolerated on `exp`, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// In production the secret must be at least 32 bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production && secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.leeway_secs > 300 {
            return Err(ValidationError::LeewayTooLarge);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(String::new()),
            issuer: None,
            leeway_secs: default_leeway(),
        }
    }
}

fn default_leeway() -> u64 {
    30
}
