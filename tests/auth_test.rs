//! Authentication layer tests: password hashing, token issuance and lookup,
//! and field validation.

mod common;

use common::{UserBuilder, setup_test_db};
use pollsapi::auth::{password, token, validate};

const TEST_PASSWORD: &str = "password123";

#[test]
fn test_hash_password_success() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    assert!(!hash.is_empty());
    assert!(hash.len() > 20); // Argon2 hashes are long
}

#[test]
fn test_verify_password_correct() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    let verified = password::verify_password(TEST_PASSWORD, &hash).expect("Verification failed");

    assert!(verified);
}

#[test]
fn test_verify_password_incorrect() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    let verified = password::verify_password("wrongpassword", &hash).expect("Verification failed");

    assert!(!verified);
}

#[test]
fn test_hash_password_randomness() {
    let hash1 = password::hash_password(TEST_PASSWORD).expect("Failed to hash first password");
    let hash2 = password::hash_password(TEST_PASSWORD).expect("Failed to hash second password");

    // Same password should produce different hashes (different salts)
    assert_ne!(hash1, hash2);

    // But both hashes should verify with the same password
    assert!(password::verify_password(TEST_PASSWORD, &hash1).expect("Verification 1 failed"));
    assert!(password::verify_password(TEST_PASSWORD, &hash2).expect("Verification 2 failed"));
}

#[test]
fn test_generate_key_shape() {
    let key = token::generate_key();
    assert_eq!(key.len(), 40);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit()));

    // Two keys should never collide
    assert_ne!(key, token::generate_key());
}

#[tokio::test]
async fn test_token_ensure_is_idempotent() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let user = UserBuilder::new("tokenuser").create(pool).await;

    let first = token::ensure(pool, user.id).await.expect("issue token");
    let second = token::ensure(pool, user.id).await.expect("re-issue token");
    assert_eq!(first, second, "a user keeps one persistent token");
}

#[tokio::test]
async fn test_token_lookup() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let user = UserBuilder::new("tokenuser").create(pool).await;
    let key = token::ensure(pool, user.id).await.expect("issue token");

    let found = token::find_user_id_by_key(pool, &key).await.expect("lookup");
    assert_eq!(found, Some(user.id));

    let missing = token::find_user_id_by_key(pool, "fake_token").await.expect("lookup");
    assert!(missing.is_none());
}

#[test]
fn test_validate_username() {
    assert!(validate::validate_username("alice").is_none());
    assert!(validate::validate_username("al.ice+test@home_1").is_none());

    assert!(validate::validate_username("").is_some());
    assert!(validate::validate_username("   ").is_some());
    assert!(validate::validate_username("has spaces").is_some());
    assert!(validate::validate_username(&"x".repeat(151)).is_some());
}

#[test]
fn test_validate_password() {
    assert!(validate::validate_password("12345678").is_none());

    assert!(validate::validate_password("").is_some());
    assert!(validate::validate_password("short").is_some());
}

#[test]
fn test_validate_email() {
    assert!(validate::validate_email("").is_none(), "email is optional");
    assert!(validate::validate_email("a@b.com").is_none());

    assert!(validate::validate_email("not-an-email").is_some());
    assert!(validate::validate_email(&format!("{}@b.com", "x".repeat(254))).is_some());
}

#[test]
fn test_validate_choice() {
    let choices = &["python", "rust"];
    assert!(validate::validate_choice("rust", choices).is_none());

    let err = validate::validate_choice("cobol", choices).expect("invalid choice");
    assert_eq!(err, "\"cobol\" is not a valid choice.");
}
