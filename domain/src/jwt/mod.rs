//! Verification of the bearer tokens presented by connecting clients.
//!
//! Tokens are HS256 JWTs signed with the secret shared with the issuing
//! application. A token is accepted when its signature checks out, it has not
//! expired, and it names a user in its `user_id` claim.

use crate::error::{AuthErrorKind, DomainErrorKind, Error};
use claims::AccessClaims;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::*;

pub(crate) mod claims;

/// Resolves a bearer token to the identity it was issued for.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String, Error>;
}

/// [`TokenVerifier`] for HS256-signed JWTs.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret_key: &str) -> Self {
        // `exp` is required and checked by the default validation.
        let validation = Validation::new(Algorithm::HS256);

        Self {
            key: DecodingKey::from_secret(secret_key.as_bytes()),
            validation,
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<String, Error> {
        let token_data = decode::<AccessClaims>(token, &self.key, &self.validation)?;

        token_data.claims.identity().ok_or_else(|| {
            warn!("Access token verified but carries no usable user_id claim");
            Error {
                source: None,
                error_kind: DomainErrorKind::Auth(AuthErrorKind::MissingIdentity),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
    use serde_json::{json, Value};

    const SECRET: &str = "test-secret";

    fn token(claims: Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn fresh_exp() -> u64 {
        get_current_timestamp() + 600
    }

    fn auth_kind(err: Error) -> AuthErrorKind {
        match err.error_kind {
            DomainErrorKind::Auth(kind) => kind,
        }
    }

    #[test]
    fn accepts_valid_token() {
        let verifier = JwtVerifier::new(SECRET);
        let token = token(json!({"user_id": "17", "exp": fresh_exp()}), SECRET);

        assert_eq!(verifier.verify(&token).unwrap(), "17");
    }

    #[test]
    fn accepts_integer_user_id() {
        let verifier = JwtVerifier::new(SECRET);
        let token = token(
            json!({"user_id": 17, "exp": fresh_exp(), "token_type": "access"}),
            SECRET,
        );

        assert_eq!(verifier.verify(&token).unwrap(), "17");
    }

    #[test]
    fn rejects_wrong_signature() {
        let verifier = JwtVerifier::new(SECRET);
        let token = token(json!({"user_id": "17", "exp": fresh_exp()}), "other-secret");

        assert_eq!(auth_kind(verifier.verify(&token).unwrap_err()), AuthErrorKind::Invalid);
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = JwtVerifier::new(SECRET);
        // Well outside the default leeway.
        let exp = get_current_timestamp() - 3600;
        let token = token(json!({"user_id": "17", "exp": exp}), SECRET);

        assert_eq!(auth_kind(verifier.verify(&token).unwrap_err()), AuthErrorKind::Expired);
    }

    #[test]
    fn rejects_token_without_exp() {
        let verifier = JwtVerifier::new(SECRET);
        let token = token(json!({"user_id": "17"}), SECRET);

        assert_eq!(auth_kind(verifier.verify(&token).unwrap_err()), AuthErrorKind::Invalid);
    }

    #[test]
    fn rejects_token_without_identity() {
        let verifier = JwtVerifier::new(SECRET);
        let token = token(json!({"sub": "17", "exp": fresh_exp()}), SECRET);

        assert_eq!(
            auth_kind(verifier.verify(&token).unwrap_err()),
            AuthErrorKind::MissingIdentity
        );
    }

    #[test]
    fn rejects_garbage() {
        let verifier = JwtVerifier::new(SECRET);

        assert_eq!(
            auth_kind(verifier.verify("not-a-jwt").unwrap_err()),
            AuthErrorKind::Invalid
        );
    }
}
