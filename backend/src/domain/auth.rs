//! Authentication primitives: login credentials and password hashing.
//!
//! Inbound adapters build [`LoginCredentials`] from raw form values; the
//! constructor validates shape before any lookup happens.

use std::sync::LazyLock;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// Validation failures for login and provisioning input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or only whitespace.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is kept exactly as typed and is not blank.
/// - `password` is non-empty; whitespace is preserved verbatim.
///
/// # Examples
/// ```
/// use clinica::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ana@clinica.cl", "secreto").unwrap();
/// assert_eq!(creds.email(), "ana@clinica.cl");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        if email.trim().is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the exact-match user lookup.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Plaintext password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Failure while producing a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to hash password: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// Hash `password` into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError {
            message: err.to_string(),
        })
}

/// Outcome of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    /// The password produced the stored hash.
    Match,
    /// The hash is valid but the password is wrong.
    Mismatch,
    /// The stored value is not a parseable PHC hash.
    MalformedHash,
}

/// Verify `password` against the stored PHC string.
#[must_use]
pub fn verify_password(stored_hash: &str, password: &str) -> PasswordCheck {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return PasswordCheck::MalformedHash;
    };
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => PasswordCheck::Match,
        Err(_) => PasswordCheck::Mismatch,
    }
}

static DECOY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("no account has this password").unwrap_or_default());

/// Hash to verify against when no account matched, so an unknown email costs
/// as much Argon2 work as a wrong password.
#[must_use]
pub fn decoy_hash() -> &'static str {
    DECOY_HASH.as_str()
}
