//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs with claims `{ id, iat, exp }`, where `id` is the
//! user id as a string and `exp` is 30 days after `iat`.

use crate::auth::{CredentialError, CredentialResult};
use crate::model::user::UserId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an issued token.
pub const TOKEN_VALIDITY_DAYS: i64 = 30;

const BEARER_SCHEME: &str = "bearer";

/// Claims carried by an identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and validates identity tokens with one shared secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> CredentialResult<Self> {
        if secret.is_empty() {
            return Err(CredentialError::InvalidSettings(
                "token secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        })
    }

    /// Issues a token for `user_id` valid from now.
    pub fn issue(&self, user_id: UserId) -> CredentialResult<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if it had been signed at `issued_at`.
    pub fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> CredentialResult<String> {
        let claims = TokenClaims {
            id: Some(user_id.to_string()),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        };
        self.sign(&claims)
    }

    /// Signs arbitrary claims with the issuer secret.
    pub fn sign(&self, claims: &TokenClaims) -> CredentialResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(CredentialError::TokenEncoding)
    }

    /// Validates signature and expiry and returns the decoded claims.
    pub fn decode(&self, token: &str) -> CredentialResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                warn!(
                    "event=token_verify module=auth status=rejected reason={:?}",
                    err.kind()
                );
                CredentialError::InvalidToken(err.to_string())
            })
    }

    /// Validates `token` and extracts its user id.
    ///
    /// A token without an `id` claim is valid but anonymous (`Ok(None)`);
    /// an `id` that is not a user identifier makes the token invalid.
    pub fn subject(&self, token: &str) -> CredentialResult<Option<UserId>> {
        let claims = self.decode(token)?;
        match claims.id.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => Uuid::parse_str(raw).map(Some).map_err(|_| {
                warn!("event=token_verify module=auth status=rejected reason=malformed_subject");
                CredentialError::InvalidToken("token subject is not a user id".to_string())
            }),
        }
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// Accepts both `Bearer <token>` and a bare token. Missing or blank values
/// yield `None`, meaning the request is anonymous.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => rest.trim(),
        _ => value,
    };
    if token.is_empty() || token.eq_ignore_ascii_case(BEARER_SCHEME) {
        None
    } else {
        Some(token)
    }
}
