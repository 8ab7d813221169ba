/// Unit tests for token issuance and verification
///
/// This test module covers:
/// - Claim contents after a roundtrip
/// - Rejection of tampered, foreign and expired tokens
/// - Digest stability for revocation records

use admin_service::models::Role;
use admin_service::security::jwt::{token_digest, TokenIssuer};

const SECRET: &str = "integration-test-secret";

#[test]
fn test_roundtrip_preserves_subject_and_role() {
    let issuer = TokenIssuer::new(SECRET, 3600);
    let token = issuer.issue("I-X7K2PQ", Role::Supervisor).unwrap();
    let claims = issuer.verify(&token).unwrap();

    assert_eq!(claims.sub, "I-X7K2PQ");
    assert_eq!(claims.role, Role::Supervisor);
}

#[test]
fn test_expiry_is_issue_time_plus_ttl() {
    let issuer = TokenIssuer::new(SECRET, 1234);
    let token = issuer.issue("A-ADMIN1", Role::Admin).unwrap();
    let claims = issuer.verify(&token).unwrap();

    assert_eq!(claims.exp - claims.iat, 1234);
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let issuer = TokenIssuer::new(SECRET, 3600);
    let foreign = TokenIssuer::new("some-other-secret", 3600);

    let token = foreign.issue("I-X7K2PQ", Role::Supervisor).unwrap();
    assert!(issuer.verify(&token).is_err());
}

#[test]
fn test_tampered_token_is_rejected() {
    let issuer = TokenIssuer::new(SECRET, 3600);
    let token = issuer.issue("I-X7K2PQ", Role::Supervisor).unwrap();

    let mut tampered = token.clone();
    tampered.pop();
    tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

    assert!(issuer.verify(&tampered).is_err());
}

#[test]
fn test_expired_token_is_rejected() {
    // Past the 60s default validation leeway.
    let issuer = TokenIssuer::new(SECRET, -120);
    let token = issuer.issue("I-X7K2PQ", Role::Supervisor).unwrap();
    assert!(issuer.verify(&token).is_err());
}

#[test]
fn test_digest_is_deterministic_and_token_specific() {
    let issuer = TokenIssuer::new(SECRET, 3600);
    let a = issuer.issue("I-X7K2PQ", Role::Supervisor).unwrap();
    let b = issuer.issue("A-ADMIN1", Role::Admin).unwrap();

    assert_eq!(token_digest(&a), token_digest(&a));
    assert_ne!(token_digest(&a), token_digest(&b));
    assert_eq!(token_digest(&a).len(), 64);
}
