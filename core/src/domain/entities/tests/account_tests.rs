//! Unit tests for the account entity

use crate::domain::entities::account::{Account, RoleName};

#[test]
fn test_role_serializes_upper_case() {
    let json = serde_json::to_string(&RoleName::Manager).unwrap();
    assert_eq!(json, "\"MANAGER\"");

    let role: RoleName = serde_json::from_str("\"STAFF\"").unwrap();
    assert_eq!(role, RoleName::Staff);
}

#[test]
fn test_role_from_str_is_case_insensitive() {
    assert_eq!("admin".parse::<RoleName>().unwrap(), RoleName::Admin);
    assert_eq!("User".parse::<RoleName>().unwrap(), RoleName::User);
    assert!("owner".parse::<RoleName>().is_err());
}

#[test]
fn test_password_verification() {
    let account = Account::with_password("Lan", "lan@orchid.shop", "secret-pass", RoleName::User).unwrap();

    assert_ne!(account.password_hash, "secret-pass");
    assert!(account.verify_password("secret-pass"));
    assert!(!account.verify_password("wrong-pass"));
}

#[test]
fn test_malformed_hash_never_verifies() {
    let account = Account::new("Lan", "lan@orchid.shop", "not-a-bcrypt-hash", RoleName::User);
    assert!(!account.verify_password("not-a-bcrypt-hash"));
}

#[test]
fn test_password_hash_not_serialized() {
    let account = Account::new("Lan", "lan@orchid.shop", "$2b$hash", RoleName::Admin);
    let json = serde_json::to_value(&account).unwrap();

    assert!(json.get("password_hash").is_none());
    assert_eq!(json["role"], "ADMIN");
    assert_eq!(json["email"], "lan@orchid.shop");
}
