//! HS256 token decoding on top of the transport-agnostic claims model.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use thiserror::Error;

use shopkeeper_auth::{validate_claims, JwtClaims, TokenValidationError};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token decode failed: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// HS256 validator bound to one shared secret.
pub struct Hs256JwtValidator {
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The deterministic window check in shopkeeper-auth owns time
        // validation; jsonwebtoken only verifies the signature and shape.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

/// Mint a token for the given claims. Dev/test tooling; production tokens
/// come from the identity provider.
pub fn sign(claims: &JwtClaims, secret: &[u8]) -> Result<String, JwtError> {
    let header = jsonwebtoken::Header::new(Algorithm::HS256);
    Ok(jsonwebtoken::encode(
        &header,
        claims,
        &EncodingKey::from_secret(secret),
    )?)
}

#[cfg(test)]
mod tests {
    use shopkeeper_auth::{PrincipalId, Role};
    use shopkeeper_core::TenantId;

    use super::*;

    fn claims() -> JwtClaims {
        let now = Utc::now().timestamp();
        JwtClaims {
            sub: PrincipalId::new(),
            tenant_id: TenantId::new(),
            role: Role::Admin,
            iat: now - 60,
            exp: now + 3600,
        }
    }

    #[test]
    fn round_trips_signed_token() {
        let claims = claims();
        let token = sign(&claims, b"secret").unwrap();
        let validator = Hs256JwtValidator::new(b"secret");
        let decoded = validator.validate(&token, Utc::now()).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = sign(&claims(), b"secret").unwrap();
        let validator = Hs256JwtValidator::new(b"other-secret");
        assert!(matches!(
            validator.validate(&token, Utc::now()),
            Err(JwtError::Decode(_))
        ));
    }

    #[test]
    fn expired_claims_rejected() {
        let mut claims = claims();
        claims.exp = claims.iat + 1;
        let token = sign(&claims, b"secret").unwrap();
        let validator = Hs256JwtValidator::new(b"secret");
        assert!(matches!(
            validator.validate(&token, Utc::now()),
            Err(JwtError::Claims(TokenValidationError::Expired))
        ));
    }
}
