//! Session flow tests against the in-memory store

use labgate::auth::{hash_password, CookieOptions, Role, SessionService, SignupOutcome, TokenCodec};
use labgate::error::Error;
use labgate::oauth::GoogleProfile;
use labgate::store::{CredentialStore, MemoryStore, NewUser, SharedStore};
use std::sync::Arc;

fn service(store: Arc<MemoryStore>) -> SessionService {
    let shared: SharedStore = store;
    SessionService::new(
        shared,
        TokenCodec::new("test-secret", 30),
        CookieOptions::new("token", false, 30),
    )
}

fn password_user(email: &str, password: &str) -> NewUser {
    NewUser {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        password_hash: Some(hash_password(password).unwrap()),
        google_id: None,
    }
}

#[tokio::test]
async fn test_login_issues_token_for_matching_record() {
    let store = Arc::new(MemoryStore::new());
    let id = store.seed_user(Role::Student, password_user("a@x.com", "p1")).await;
    let sessions = service(store);

    let session = sessions
        .login("a@x.com", "p1", Role::Student)
        .await
        .expect("Login should succeed");

    assert_eq!(session.identity.id, id);
    assert_eq!(session.identity.email, "a@x.com");
    assert_eq!(session.identity.role, Role::Student);

    // The token's claims decode back to the record's identity
    let claims = sessions.codec().verify(&session.token).unwrap();
    assert_eq!(claims.sub, id);
    assert_eq!(claims.role, Role::Student);
    assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(Role::Student, password_user("a@x.com", "p1")).await;
    let sessions = service(store.clone());

    // Unknown email and wrong password produce the same error
    let unknown = sessions.login("b@x.com", "p1", Role::Student).await;
    let wrong = sessions.login("a@x.com", "nope", Role::Student).await;
    assert!(matches!(unknown, Err(Error::InvalidCredentials)));
    assert!(matches!(wrong, Err(Error::InvalidCredentials)));

    // Right email, wrong role table
    let wrong_role = sessions.login("a@x.com", "p1", Role::Instructor).await;
    assert!(matches!(wrong_role, Err(Error::InvalidCredentials)));

    // Store outage during lookup is indistinguishable too
    store.set_failing(true);
    let outage = sessions.login("a@x.com", "p1", Role::Student).await;
    assert!(matches!(outage, Err(Error::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_rejects_oauth_only_account() {
    let store = Arc::new(MemoryStore::new());
    store
        .seed_user(
            Role::Student,
            NewUser {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "g@x.com".to_string(),
                password_hash: None,
                google_id: Some("g-1".to_string()),
            },
        )
        .await;
    let sessions = service(store);

    let result = sessions.login("g@x.com", "anything", Role::Student).await;
    assert!(matches!(result, Err(Error::InvalidCredentials)));
}

#[tokio::test]
async fn test_signup_creates_record_and_session() {
    let store = Arc::new(MemoryStore::new());
    let sessions = service(store.clone());

    let outcome = sessions
        .sign_up("Ada", "Lovelace", "a@x.com", "p1", Role::Instructor)
        .await
        .expect("Signup should succeed");

    let SignupOutcome::Created(session) = outcome else {
        panic!("Fresh email should create a record");
    };
    assert_eq!(session.identity.role, Role::Instructor);
    assert_eq!(store.user_count(Role::Instructor).await, 1);

    // Stored hash verifies, plaintext is not stored
    let records = store.users_by_email(Role::Instructor, "a@x.com").await.unwrap();
    let hash = records[0].password_hash.as_deref().unwrap();
    assert_ne!(hash, "p1");
    assert!(labgate::auth::verify_password("p1", hash));
}

#[tokio::test]
async fn test_signup_with_matching_password_is_implicit_login() {
    let store = Arc::new(MemoryStore::new());
    let id = store.seed_user(Role::Student, password_user("a@x.com", "p1")).await;
    let sessions = service(store.clone());

    let outcome = sessions
        .sign_up("Ada", "Lovelace", "a@x.com", "p1", Role::Student)
        .await
        .expect("Matching signup should log in");

    let SignupOutcome::LoggedIn(session) = outcome else {
        panic!("Matching email+password should behave as login");
    };
    assert_eq!(session.identity.id, id);
    // No second record appears
    assert_eq!(store.user_count(Role::Student).await, 1);
}

#[tokio::test]
async fn test_signup_with_existing_email_wrong_password_is_duplicate() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(Role::Student, password_user("a@x.com", "p1")).await;
    let sessions = service(store.clone());

    let result = sessions
        .sign_up("Ada", "Lovelace", "a@x.com", "other", Role::Student)
        .await;

    assert!(matches!(result, Err(Error::DuplicateAccount)));
    assert_eq!(store.user_count(Role::Student).await, 1);
}

#[tokio::test]
async fn test_cross_role_email_collision_allowed() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(Role::Student, password_user("a@x.com", "p1")).await;
    let sessions = service(store.clone());

    // Same email signs up as instructor without conflict
    let outcome = sessions
        .sign_up("Ada", "Lovelace", "a@x.com", "p2", Role::Instructor)
        .await
        .unwrap();
    assert!(matches!(outcome, SignupOutcome::Created(_)));
    assert_eq!(store.user_count(Role::Student).await, 1);
    assert_eq!(store.user_count(Role::Instructor).await, 1);
}

#[tokio::test]
async fn test_google_login_creates_passwordless_record_once() {
    let store = Arc::new(MemoryStore::new());
    let sessions = service(store.clone());
    let profile = GoogleProfile {
        google_id: "g-123".to_string(),
        email: "g@x.com".to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
    };

    let first = sessions.google_login(&profile, Role::Student).await.unwrap();
    let second = sessions.google_login(&profile, Role::Student).await.unwrap();

    assert_eq!(first.identity.id, second.identity.id);
    assert_eq!(store.user_count(Role::Student).await, 1);

    let records = store.users_by_email(Role::Student, "g@x.com").await.unwrap();
    assert!(records[0].password_hash.is_none());
    assert_eq!(records[0].google_id.as_deref(), Some("g-123"));

    // The signed payload carries the role (canonical flow)
    let claims = sessions.codec().verify(&first.token).unwrap();
    assert_eq!(claims.role, Role::Student);
    assert_eq!(claims.email, "g@x.com");
}

#[tokio::test]
async fn test_status_reports_without_side_effects() {
    let store = Arc::new(MemoryStore::new());
    let id = store.seed_user(Role::Student, password_user("a@x.com", "p1")).await;
    let sessions = service(store);

    let anon = sessions.status(None);
    assert!(!anon.is_logged_in);
    assert!(anon.role.is_none() && anon.id.is_none());

    let garbage = sessions.status(Some("not-a-token"));
    assert!(!garbage.is_logged_in);

    let session = sessions.login("a@x.com", "p1", Role::Student).await.unwrap();
    let live = sessions.status(Some(&session.token));
    assert!(live.is_logged_in);
    assert_eq!(live.id, Some(id));
    assert_eq!(live.role, Some(Role::Student));
}
