use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use rand_core::OsRng;

use crate::domain::errors::DomainError;
use crate::domain::ports::PasswordEncoder;

/// Argon2id with the crate's default parameters and a random salt per hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, DomainError> {
        if raw.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| DomainError::Internal(format!("failed to hash password: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    use super::*;

    #[test]
    fn hash_verifies_and_is_salted() {
        let encoder = Argon2PasswordEncoder;
        let first = encoder.encode("s3cret").unwrap();
        let second = encoder.encode("s3cret").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));

        let parsed = PasswordHash::new(&first).unwrap();
        assert!(Argon2::default()
            .verify_password(b"s3cret", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"wrong", &parsed)
            .is_err());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(matches!(
            Argon2PasswordEncoder.encode("   "),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
