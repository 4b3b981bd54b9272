//! Staff identities: user accounts, roles, doctor profiles and the
//! authenticated session snapshot carried between requests.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display name used when a doctor-role user has no usable profile name.
pub const FALLBACK_DOCTOR_NAME: &str = "Doctor";

/// Primary key of a row in `usuarios`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw database identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw database identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of a row in `doctores`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoctorId(i32);

impl DoctorId {
    /// Wrap a raw database identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw database identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Staff roles the application knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Records visits and sees the doctor dashboard.
    Doctor,
    /// Sees the admin placeholder.
    Admin,
}

impl Role {
    /// Value stored in `usuarios.rol` and in the session cookie.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role. Unknown values yield `None`; callers must treat
    /// that as a distinct case and never default to a known role.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "doctor" => Some(Self::Doctor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `usuarios` row as needed for authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Row id.
    pub id: UserId,
    /// Login email, unique.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Raw role text. Kept unparsed so corrupted values reach the dashboard
    /// router, which rejects them.
    pub role: String,
}

/// A `doctores` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorProfile {
    /// Row id.
    pub id: DoctorId,
    /// Full name as registered.
    pub full_name: String,
    /// Doctor's RUT.
    pub rut: String,
    /// Owning login account.
    pub user_id: UserId,
}

impl DoctorProfile {
    /// First whitespace-delimited token of the full name, as greeted on the
    /// dashboard.
    #[must_use]
    pub fn display_name(&self) -> String {
        first_name(&self.full_name)
    }
}

/// First whitespace-delimited token of `full_name`, or
/// [`FALLBACK_DOCTOR_NAME`] when the name is blank.
///
/// # Examples
/// ```
/// use clinica::domain::first_name;
///
/// assert_eq!(first_name("  Ana María Rojas "), "Ana");
/// assert_eq!(first_name("   "), "Doctor");
/// ```
#[must_use]
pub fn first_name(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or(FALLBACK_DOCTOR_NAME)
        .to_owned()
}

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedStaff {
    /// Account that logged in.
    pub user_id: UserId,
    /// Role exactly as stored; see [`UserAccount::role`].
    pub role: String,
    /// Greeting name; only set for doctor-role users.
    pub display_name: Option<String>,
}

/// Immutable snapshot of the session cookie, threaded through handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffSession {
    /// Logged-in account.
    pub user_id: UserId,
    /// Raw role; empty when the cookie carried none.
    pub role: String,
    /// Doctor greeting name, if stored.
    pub display_name: Option<String>,
}

impl StaffSession {
    /// Parsed role, `None` when the stored value is not recognised.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    /// Whether the session belongs to a doctor.
    #[must_use]
    pub fn is_doctor(&self) -> bool {
        self.role() == Some(Role::Doctor)
    }
}

impl From<AuthenticatedStaff> for StaffSession {
    fn from(value: AuthenticatedStaff) -> Self {
        Self {
            user_id: value.user_id,
            role: value.role,
            display_name: value.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("doctor", Some(Role::Doctor))]
    #[case("admin", Some(Role::Admin))]
    #[case("Doctor", None)]
    #[case("", None)]
    #[case("superuser", None)]
    fn role_parsing_is_exact(#[case] raw: &str, #[case] expected: Option<Role>) {
        assert_eq!(Role::parse(raw), expected);
    }

    #[rstest]
    #[case("Ana María Rojas", "Ana")]
    #[case("\tLuis\nPérez", "Luis")]
    #[case("", FALLBACK_DOCTOR_NAME)]
    fn first_name_takes_leading_token(#[case] full_name: &str, #[case] expected: &str) {
        assert_eq!(first_name(full_name), expected);
    }

    #[rstest]
    fn session_with_unknown_role_is_not_a_doctor() {
        let session = StaffSession {
            user_id: UserId::new(7),
            role: "legacy".to_owned(),
            display_name: None,
        };
        assert_eq!(session.role(), None);
        assert!(!session.is_doctor());
    }
}
