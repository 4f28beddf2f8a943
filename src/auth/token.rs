// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT issuing and validation.
//!
//! Tokens are HS256 with a shared secret. Validation pins the algorithm
//! before the secret is ever used: a token whose header names any other
//! algorithm is rejected up front, so an attacker cannot downgrade to
//! `none` or confuse key types.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};

use super::{AuthError, Role};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Claims carried by gateway-issued tokens.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user identifier)
    pub sub: String,
    /// Role granted at login
    pub role: Role,
    /// Issuer
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Not valid before (unix seconds)
    pub nbf: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Issues and validates the gateway's own JWTs.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiration: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], issuer: String, expiration: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer,
            expiration,
        }
    }

    /// How long issued tokens remain valid.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Issue a token for `subject` with the given role.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now + self.expiration.as_secs() as i64,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(|_| AuthError::MalformedToken)
    }

    /// Validate a token and return its claims.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        if header.alg != Algorithm::HS256 {
            return Err(AuthError::WrongAlgorithm);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                    ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-unit-tests!!";

    fn service() -> TokenService {
        TokenService::new(SECRET, "quasarflow-api".to_string(), Duration::from_secs(3600))
    }

    #[test]
    fn issued_token_validates() {
        let service = service();
        let token = service.issue("alice", Role::User).unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iss, "quasarflow-api");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_token_is_malformed() {
        assert_eq!(
            service().validate("not-a-jwt"),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let token = service().issue("alice", Role::User).unwrap();
        let other = TokenService::new(
            b"a-completely-different-secret!!!",
            "quasarflow-api".to_string(),
            Duration::from_secs(3600),
        );
        assert_eq!(other.validate(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let token = service().issue("alice", Role::Admin).unwrap();
        let other = TokenService::new(
            SECRET,
            "some-other-service".to_string(),
            Duration::from_secs(3600),
        );
        assert_eq!(other.validate(&token), Err(AuthError::InvalidIssuer));
    }

    #[test]
    fn foreign_algorithm_is_rejected_before_decoding() {
        // HS384-signed token with the same secret
        let claims = TokenClaims {
            sub: "alice".to_string(),
            role: Role::User,
            iss: "quasarflow-api".to_string(),
            iat: Utc::now().timestamp(),
            nbf: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(service().validate(&token), Err(AuthError::WrongAlgorithm));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Expired well beyond the leeway window
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "alice".to_string(),
            role: Role::User,
            iss: "quasarflow-api".to_string(),
            iat: now - 7200,
            nbf: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(service().validate(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn token_from_the_future_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "alice".to_string(),
            role: Role::User,
            iss: "quasarflow-api".to_string(),
            iat: now,
            nbf: now + 3600,
            exp: now + 7200,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(service().validate(&token), Err(AuthError::TokenNotYetValid));
    }
}
