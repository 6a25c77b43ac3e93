use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// Hash a password into an Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Check a password against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Argon2id hash of a throwaway password, computed once per process.
///
/// Logins for unknown user names verify against this so they cost the same
/// as a wrong password for a real account.
pub fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        hash_password("todo-api-unknown-user-placeholder").unwrap_or_else(|e| {
            tracing::error!("Could not build placeholder password hash: {}", e);
            String::new()
        })
    })
}

/// Verify against the stored hash, or against [`dummy_hash`] when there is
/// no account. The no-account case always fails.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            let _ = verify_password(password, dummy_hash());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        let hash = dummy_hash();
        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(hash).is_ok());
        assert!(std::ptr::eq(hash, dummy_hash()));
    }

    #[test]
    fn login_without_account_never_succeeds() {
        assert!(!verify_login("todo-api-unknown-user-placeholder", None));
        assert!(!verify_login("anything", None));

        let hash = hash_password("pw").unwrap();
        assert!(verify_login("pw", Some(&hash)));
        assert!(!verify_login("nope", Some(&hash)));
    }

    #[test]
    fn plaintext_stored_value_never_matches() {
        assert!(!verify_password("hunter2", "hunter2"));
        assert!(!verify_password("", ""));
    }
}
