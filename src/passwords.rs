use bcrypt::BcryptError;

/// Hashes a plaintext password with bcrypt at the configured cost.
///
/// The cost comes from `AppConfig` so production can run the library default
/// while tests run the minimum legal cost.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(plain, cost)
}

/// Verifies a plaintext password against a stored bcrypt hash.
///
/// Comparison is constant-time. A hash that fails to parse is reported as an
/// error, not as a mismatch; callers collapse both into the same generic
/// credential failure.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(plain, hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple", TEST_COST).unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("original-password", TEST_COST).unwrap();
        assert!(!verify_password("different-password", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        // Each hash embeds a fresh salt.
        let first = hash_password("repeated-password", TEST_COST).unwrap();
        let second = hash_password("repeated-password", TEST_COST).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("repeated-password", &first).unwrap());
        assert!(verify_password("repeated-password", &second).unwrap());
    }

    #[test]
    fn unicode_passwords_are_supported() {
        let hash = hash_password("pässwörd-日本語-🚀", TEST_COST).unwrap();
        assert!(verify_password("pässwörd-日本語-🚀", &hash).unwrap());
        assert!(!verify_password("pässwörd-日本語", &hash).unwrap());
    }

    #[test]
    fn garbage_stored_hash_is_an_error_not_a_match() {
        let result = verify_password("anything", "not-a-bcrypt-hash");
        assert!(result.is_err());
    }
}
