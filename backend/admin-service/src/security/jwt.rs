use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::JwtConfig;
use crate::error::Result;
use crate::models::Role;

/// JWT claims carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Human-readable account id (`A-XXXXXX` / `I-XXXXXX`)
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies bearer tokens. Keys and lifetime are injected at
/// construction so handlers and tests never reach for process globals.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, config.token_ttl_secs)
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue an HS256 token for the given account.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Decode and verify a token, rejecting expired or tampered tokens.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

/// Hex SHA-256 digest of a raw token. Revocation records store digests so a
/// leaked table never yields usable tokens.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret-key-for-unit-tests", 3600)
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = issuer();
        let token = issuer.issue("I-X7K2PQ", Role::Supervisor).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, "I-X7K2PQ");
        assert_eq!(claims.role, Role::Supervisor);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_admin_role_survives_roundtrip() {
        let issuer = issuer();
        let token = issuer.issue("A-9M4RSD", Role::Admin).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issuer().issue("I-X7K2PQ", Role::Supervisor).unwrap();
        let other = TokenIssuer::new("a-completely-different-secret", 3600);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Negative TTL beyond the default 60s validation leeway.
        let issuer = TokenIssuer::new("test-secret-key-for-unit-tests", -120);
        let token = issuer.issue("I-X7K2PQ", Role::Supervisor).unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(issuer().verify("not.a.token").is_err());
    }

    #[test]
    fn test_token_digest_is_stable_hex() {
        let d1 = token_digest("abc");
        let d2 = token_digest("abc");
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
        assert_ne!(d1, token_digest("abd"));
    }
}
