//! Password credential hashing and verification.
//!
//! # Responsibility
//! - Produce and check the opaque `password` column stored per user.
//!
//! # Invariants
//! - Stored credentials are bcrypt strings (`$2a$`, `$2b$`, `$2y$`), so rows
//!   provisioned by other bcrypt tooling verify unchanged.
//! - A malformed stored value never verifies and never surfaces as an error.
//! - Credentials and hashes are never logged.

use log::warn;

pub use bcrypt::BcryptError;

/// Work factor for newly hashed passwords.
pub const HASH_COST: u32 = 10;

/// Hashes `password` with a fresh salt at `HASH_COST`.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash_password_with_cost(password, HASH_COST)
}

/// Hashes `password` at an explicit work factor (`4..=31`).
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Returns true when `password` matches the stored credential.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match bcrypt::verify(password, stored) {
        Ok(matched) => matched,
        Err(err) => {
            warn!(
                "event=credential_verify module=auth status=error error_code=malformed_hash error={err}"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{hash_password_with_cost, verify_password};

    #[test]
    fn hashed_password_verifies_and_wrong_password_does_not() {
        let stored = hash_password_with_cost("secret", 4).unwrap();
        assert!(stored.starts_with("$2b$04$"));
        assert!(verify_password("secret", &stored));
        assert!(!verify_password("Secret", &stored));
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let first = hash_password_with_cost("secret", 4).unwrap();
        let second = hash_password_with_cost("secret", 4).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("secret", &first));
        assert!(verify_password("secret", &second));
    }

    #[test]
    fn externally_produced_bcrypt_hashes_verify() {
        let node_style = "$2b$10$N9qo8uLOickgx2ZMRZoMyecBPBZPbMY9K9Iy/VaK.7YTHTLYF41De";
        assert!(verify_password("secret", node_style));
        assert!(!verify_password("secret!", node_style));

        let legacy_prefix = "$2a$04$UuTkLRZZ6QofpDOlMz32MuuxEHA43WOemOYHPz6.SjsVsyO1tDU96";
        assert!(verify_password("password", legacy_prefix));
    }

    #[test]
    fn malformed_stored_values_never_verify() {
        assert!(!verify_password("secret", ""));
        assert!(!verify_password("secret", "secret"));
        assert!(!verify_password("secret", "$2b$10$tooshort"));
        assert!(!verify_password("secret", "sha256$salt$abcd"));
    }
}
