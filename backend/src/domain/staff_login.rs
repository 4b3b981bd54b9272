//! Login use-case backed by the staff directory.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::ports::{INVALID_CREDENTIALS, LoginService, StaffDirectory, StaffDirectoryError};
use super::{
    AuthenticatedStaff, Error, FALLBACK_DOCTOR_NAME, LoginCredentials, PasswordCheck, Role,
    UserId, decoy_hash, verify_password,
};

/// Authenticates staff against stored Argon2 hashes.
#[derive(Clone)]
pub struct StaffLoginService {
    directory: Arc<dyn StaffDirectory>,
}

impl StaffLoginService {
    /// Create the service over a staff directory adapter.
    #[must_use]
    pub fn new(directory: Arc<dyn StaffDirectory>) -> Self {
        Self { directory }
    }

    async fn doctor_display_name(&self, user_id: UserId) -> Result<String, Error> {
        let found = self
            .directory
            .find_doctor_by_user(user_id)
            .await
            .map_err(map_directory_error)?;
        match found {
            Some(profile) => Ok(profile.display_name()),
            None => {
                warn!(%user_id, "doctor-role user has no doctor profile; using fallback name");
                Ok(FALLBACK_DOCTOR_NAME.to_owned())
            }
        }
    }
}

/// Map directory failures; connectivity stays distinguishable so the login
/// page can show a friendly outage notice.
pub(crate) fn map_directory_error(error: StaffDirectoryError) -> Error {
    match error {
        StaffDirectoryError::Connection { message } => Error::service_unavailable(message),
        StaffDirectoryError::Query { message } => Error::internal(message),
    }
}

#[async_trait]
impl LoginService for StaffLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedStaff, Error> {
        let found = self
            .directory
            .find_user_by_email(credentials.email())
            .await
            .map_err(map_directory_error)?;

        let Some(account) = found else {
            let decoy = verify_password(decoy_hash(), credentials.password());
            debug!(?decoy, "login rejected: unknown account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        match verify_password(&account.password_hash, credentials.password()) {
            PasswordCheck::Match => {}
            PasswordCheck::Mismatch => {
                debug!(user_id = %account.id, "login rejected: password mismatch");
                return Err(Error::unauthorized(INVALID_CREDENTIALS));
            }
            PasswordCheck::MalformedHash => {
                warn!(user_id = %account.id, "stored password hash is not a PHC string");
                return Err(Error::unauthorized(INVALID_CREDENTIALS));
            }
        }

        let display_name = if Role::parse(&account.role) == Some(Role::Doctor) {
            Some(self.doctor_display_name(account.id).await?)
        } else {
            None
        };

        info!(user_id = %account.id, role = %account.role, "staff login succeeded");
        Ok(AuthenticatedStaff {
            user_id: account.id,
            role: account.role,
            display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockStaffDirectory;
    use crate::domain::{DoctorId, DoctorProfile, ErrorCode, UserAccount, hash_password};
    use rstest::{fixture, rstest};
    use std::time::Instant;

    const EMAIL: &str = "ana@clinica.cl";
    const PASSWORD: &str = "s3creto";

    #[fixture]
    fn stored_hash() -> String {
        hash_password(PASSWORD).expect("hash fixture password")
    }

    fn account(role: &str, password_hash: &str) -> UserAccount {
        UserAccount {
            id: UserId::new(1),
            email: EMAIL.to_owned(),
            password_hash: password_hash.to_owned(),
            role: role.to_owned(),
        }
    }

    fn service_with(directory: MockStaffDirectory) -> StaffLoginService {
        StaffLoginService::new(Arc::new(directory))
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(EMAIL, password).expect("valid credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn doctor_login_loads_first_name(stored_hash: String) {
        let mut directory = MockStaffDirectory::new();
        let user = account("doctor", &stored_hash);
        directory
            .expect_find_user_by_email()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        directory
            .expect_find_doctor_by_user()
            .return_once(|user_id| {
                Ok(Some(DoctorProfile {
                    id: DoctorId::new(4),
                    full_name: "Ana María Rojas".to_owned(),
                    rut: "11.111.111-1".to_owned(),
                    user_id,
                }))
            });

        let staff = service_with(directory)
            .authenticate(&credentials(PASSWORD))
            .await
            .expect("login succeeds");

        assert_eq!(staff.user_id, UserId::new(1));
        assert_eq!(staff.role, "doctor");
        assert_eq!(staff.display_name.as_deref(), Some("Ana"));
    }

    #[rstest]
    #[tokio::test]
    async fn doctor_without_profile_gets_fallback_name(stored_hash: String) {
        let mut directory = MockStaffDirectory::new();
        let user = account("doctor", &stored_hash);
        directory
            .expect_find_user_by_email()
            .return_once(move |_| Ok(Some(user)));
        directory
            .expect_find_doctor_by_user()
            .return_once(|_| Ok(None));

        let staff = service_with(directory)
            .authenticate(&credentials(PASSWORD))
            .await
            .expect("login still succeeds");

        assert_eq!(staff.display_name.as_deref(), Some(FALLBACK_DOCTOR_NAME));
    }

    #[rstest]
    #[tokio::test]
    async fn admin_login_skips_doctor_lookup(stored_hash: String) {
        let mut directory = MockStaffDirectory::new();
        let user = account("admin", &stored_hash);
        directory
            .expect_find_user_by_email()
            .return_once(move |_| Ok(Some(user)));
        directory.expect_find_doctor_by_user().never();

        let staff = service_with(directory)
            .authenticate(&credentials(PASSWORD))
            .await
            .expect("login succeeds");

        assert_eq!(staff.role, "admin");
        assert_eq!(staff.display_name, None);
    }

    #[rstest]
    #[case::unknown_email(None, PASSWORD)]
    #[case::wrong_password(Some("doctor"), "wrong")]
    #[case::malformed_hash(Some("broken"), PASSWORD)]
    #[tokio::test]
    async fn rejections_are_indistinguishable(
        stored_hash: String,
        #[case] existing: Option<&str>,
        #[case] password: &str,
    ) {
        let mut directory = MockStaffDirectory::new();
        let user = existing.map(|role| {
            if role == "broken" {
                account("doctor", "not-a-phc-string")
            } else {
                account(role, &stored_hash)
            }
        });
        directory
            .expect_find_user_by_email()
            .return_once(move |_| Ok(user));
        directory.expect_find_doctor_by_user().never();

        let err = service_with(directory)
            .authenticate(&credentials(password))
            .await
            .expect_err("login must fail");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn email_reaches_the_directory_verbatim() {
        let mut directory = MockStaffDirectory::new();
        directory
            .expect_find_user_by_email()
            .withf(|email: &str| email == " Ana@Clinica.cl ")
            .times(1)
            .return_once(|_| Ok(None));
        let creds = LoginCredentials::try_from_parts(" Ana@Clinica.cl ", PASSWORD)
            .expect("valid credentials");

        let err = service_with(directory)
            .authenticate(&creds)
            .await
            .expect_err("unknown account");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_still_pays_for_a_hash_check(stored_hash: String) {
        assert!(!decoy_hash().is_empty(), "decoy hash is computed once up front");
        let started = Instant::now();
        assert_eq!(verify_password(&stored_hash, "wrong"), PasswordCheck::Mismatch);
        let one_check = started.elapsed();

        let mut directory = MockStaffDirectory::new();
        directory
            .expect_find_user_by_email()
            .return_once(|_| Ok(None));
        let started = Instant::now();
        let err = service_with(directory)
            .authenticate(&credentials(PASSWORD))
            .await
            .expect_err("unknown account");
        let unknown = started.elapsed();

        assert_eq!(err.message(), INVALID_CREDENTIALS);
        assert!(
            unknown * 4 >= one_check,
            "unknown email answered in {unknown:?}, one hash check takes {one_check:?}"
        );
    }

    #[rstest]
    #[case(StaffDirectoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(StaffDirectoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn directory_failures_are_mapped(
        #[case] failure: StaffDirectoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut directory = MockStaffDirectory::new();
        directory
            .expect_find_user_by_email()
            .return_once(move |_| Err(failure));

        let err = service_with(directory)
            .authenticate(&credentials(PASSWORD))
            .await
            .expect_err("directory failure surfaces");

        assert_eq!(err.code(), expected);
    }
}
