use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Claims carried by a bearer token. Every field is optional on the wire;
/// `exp` is enforced only when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new(subject: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: Some(subject.into()),
            iat: Some(now.timestamp()),
            exp: Some((now + ttl).timestamp()),
        }
    }
}

/// Why a request failed the token gate
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication token is required")]
    Missing,

    #[error("Invalid or expired token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret is empty")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    Generation(#[from] jsonwebtoken::errors::Error),
}

/// HMAC signer/verifier bound to the server secret. Issues HS256, accepts
/// any HMAC-SHA2 variant.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    /// Check signature and expiry of a raw token
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::Invalid)
    }

    /// Verify the value of an `Authorization` header.
    ///
    /// An absent or blank header is `Missing`. A header with content that
    /// does not carry a usable `Bearer <token>` is treated like a bad token.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header
            .filter(|h| !h.trim().is_empty())
            .ok_or(AuthError::Missing)?;
        let token = header.split(' ').nth(1).unwrap_or_default();
        self.verify(token)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET).unwrap()
    }

    #[test]
    fn issued_token_round_trips() {
        let verifier = verifier();
        let claims = Claims::new("reader-1", Duration::hours(1));
        let token = verifier.issue(&claims).unwrap();
        assert_eq!(verifier.verify(&token).unwrap(), claims);
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = verifier();
        let token = verifier
            .issue(&Claims::new("reader-1", Duration::hours(-1)))
            .unwrap();
        assert!(matches!(verifier.verify(&token), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn token_without_exp_is_accepted() {
        let verifier = verifier();
        let claims = Claims { sub: Some("svc".into()), iat: None, exp: None };
        let token = verifier.issue(&claims).unwrap();
        assert_eq!(verifier.verify(&token).unwrap().sub.as_deref(), Some("svc"));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let other = TokenVerifier::new("other-secret").unwrap();
        let token = other.issue(&Claims::new("x", Duration::hours(1))).unwrap();
        assert!(matches!(verifier().verify(&token), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn every_hmac_variant_is_accepted() {
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        let claims = Claims::new("svc", Duration::hours(1));
        for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let token = encode(&Header::new(alg), &claims, &key).unwrap();
            assert_eq!(verifier().verify(&token).unwrap(), claims, "{alg:?}");
        }
    }

    #[test]
    fn header_parsing() {
        let verifier = verifier();
        let token = verifier.issue(&Claims::new("x", Duration::hours(1))).unwrap();

        assert!(matches!(verifier.verify_header(None), Err(AuthError::Missing)));
        assert!(matches!(verifier.verify_header(Some("")), Err(AuthError::Missing)));
        assert!(matches!(verifier.verify_header(Some("   ")), Err(AuthError::Missing)));
        assert!(matches!(verifier.verify_header(Some("Bearer")), Err(AuthError::Invalid(_))));
        assert!(matches!(verifier.verify_header(Some("garbage")), Err(AuthError::Invalid(_))));
        assert!(verifier.verify_header(Some(&format!("Bearer {token}"))).is_ok());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(TokenVerifier::new(""), Err(TokenError::InvalidSecret)));
    }
}
