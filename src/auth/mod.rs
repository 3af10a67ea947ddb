use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// JWT payload for catalog API tokens. The username travels as the `name`
/// claim and `sub` is a freshly generated identifier per token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_name: String) -> Self {
        let now = Utc::now();
        let jwt = &config::config().jwt;
        let exp = (now + Duration::minutes(jwt.expiry_minutes)).timestamp();

        Self {
            name: user_name,
            sub: Uuid::new_v4().to_string(),
            iss: jwt.issuer.clone(),
            aud: jwt.audience.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT signing key"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Issue a signed bearer token for the given username.
///
/// No credential check happens here: any username yields a valid token.
/// Credential validation belongs in front of this call once a user store exists.
pub fn generate_token(user_name: impl Into<String>) -> Result<String, JwtError> {
    generate_jwt(Claims::new(user_name.into()))
}

pub fn generate_jwt(claims: Claims) -> Result<String, JwtError> {
    let key = &config::config().jwt.key;

    if key.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(key.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn decode_token(token: &str) -> Claims {
        let jwt = &config::config().jwt;
        let mut validation = Validation::default();
        validation.set_issuer(&[&jwt.issuer]);
        validation.set_audience(&[&jwt.audience]);

        decode::<Claims>(token, &DecodingKey::from_secret(jwt.key.as_bytes()), &validation)
            .expect("token should decode with configured key")
            .claims
    }

    #[test]
    fn token_carries_username_as_name_claim() {
        let token = generate_token("alice").expect("token");
        let claims = decode_token(&token);
        assert_eq!(claims.name, "alice");
    }

    #[test]
    fn subject_claim_is_a_fresh_uuid() {
        let first = decode_token(&generate_token("bob").expect("token"));
        let second = decode_token(&generate_token("bob").expect("token"));

        Uuid::parse_str(&first.sub).expect("sub should be a UUID");
        assert_ne!(first.sub, second.sub);
    }

    #[test]
    fn token_expires_after_configured_minutes() {
        let claims = decode_token(&generate_token("carol").expect("token"));
        let expiry_minutes = config::config().jwt.expiry_minutes;
        assert_eq!(claims.exp - claims.iat, expiry_minutes * 60);
    }
}
