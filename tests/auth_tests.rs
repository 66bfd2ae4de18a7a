//! Token codec and password hasher tests

use labgate::auth::{hash_password, verify_password, Claims, Identity, Role, TokenCodec};
use labgate::error::Error;

fn codec() -> TokenCodec {
    TokenCodec::new("integration-secret", 30)
}

fn identity() -> Identity {
    Identity {
        id: 7,
        email: "a@x.com".to_string(),
        role: Role::Student,
    }
}

#[test]
fn test_token_round_trip_preserves_claims() {
    let codec = codec();
    let token = codec.issue(&identity()).expect("Failed to issue token");
    assert_eq!(token.split('.').count(), 3); // JWT format: header.payload.signature

    let claims = codec.verify(&token).expect("Failed to verify token");
    assert_eq!(claims.sub, 7);
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.role, Role::Student);
    assert_eq!(claims.identity(), identity());
}

#[test]
fn test_token_expiry_is_thirty_days() {
    let claims = codec().verify(&codec().issue(&identity()).unwrap()).unwrap();
    assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
}

#[test]
fn test_instructor_role_survives_round_trip() {
    let codec = codec();
    let token = codec
        .issue(&Identity {
            id: 3,
            email: "t@x.com".to_string(),
            role: Role::Instructor,
        })
        .unwrap();
    assert_eq!(codec.verify(&token).unwrap().role, Role::Instructor);
}

#[test]
fn test_expired_token_rejected() {
    // Encode an already-expired claim set with the same secret
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: 7,
        email: "a@x.com".to_string(),
        role: Role::Student,
        iat: now - 31 * 24 * 60 * 60,
        exp: now - 24 * 60 * 60,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"integration-secret"),
    )
    .unwrap();

    assert!(matches!(codec().verify(&token), Err(Error::TokenInvalid)));
}

#[test]
fn test_tampered_and_malformed_tokens_rejected() {
    let codec = codec();
    let token = codec.issue(&identity()).unwrap();

    let mut parts: Vec<&str> = token.split('.').collect();
    parts[2] = "AAAAAAAAAAAAAAAAAAAA";
    assert!(codec.verify(&parts.join(".")).is_err());

    assert!(codec.verify("").is_err());
    assert!(codec.verify("not-a-jwt-token").is_err());
    assert!(codec.verify("a.b").is_err());
}

#[test]
fn test_token_signed_with_other_secret_rejected() {
    let token = TokenCodec::new("other-secret", 30).issue(&identity()).unwrap();
    assert!(codec().verify(&token).is_err());
}

#[test]
fn test_password_hash_round_trip() {
    let hash = hash_password("p1").expect("Failed to hash");
    assert_ne!(hash, "p1"); // never stored in the clear
    assert!(verify_password("p1", &hash));
    assert!(!verify_password("p2", &hash));
}

#[test]
fn test_verify_malformed_hash_is_false_not_panic() {
    assert!(!verify_password("p1", "garbage"));
}

#[test]
fn test_oauth_state_round_trip_and_tamper() {
    let codec = codec();
    let state = codec.sign_state(Role::Instructor).unwrap();
    assert_eq!(codec.verify_state(&state).unwrap(), Role::Instructor);

    assert!(codec.verify_state("tampered-state").is_err());
    // State signed by another deployment's secret is rejected
    let foreign = TokenCodec::new("other-secret", 30).sign_state(Role::Student).unwrap();
    assert!(codec.verify_state(&foreign).is_err());
}
