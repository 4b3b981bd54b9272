//! Out-of-band doctor account provisioning.

use std::sync::Arc;

use tracing::info;
use zeroize::Zeroizing;

use super::ports::{
    DoctorProvisioning, DoctorProvisioningError, NewDoctorAccount, ProvisionedDoctor,
};
use super::{Error, LoginCredentials, LoginValidationError, Role, hash_password};

/// Validation failures for a doctor registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Full name was blank.
    #[error("full name must not be empty")]
    EmptyFullName,
    /// RUT was blank.
    #[error("rut must not be empty")]
    EmptyRut,
    /// Email or password failed login validation.
    #[error(transparent)]
    Credentials(#[from] LoginValidationError),
}

/// Validated doctor registration with the plaintext password still held in
/// a zeroizing buffer.
#[derive(Debug, Clone)]
pub struct DoctorRegistration {
    full_name: String,
    rut: String,
    credentials: LoginCredentials,
}

impl DoctorRegistration {
    /// Validate raw registration fields.
    ///
    /// Name, RUT and email are stored trimmed; login later matches the email
    /// exactly as stored.
    pub fn try_from_parts(
        full_name: &str,
        rut: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let name = full_name.trim();
        if name.is_empty() {
            return Err(RegistrationValidationError::EmptyFullName);
        }
        let trimmed_rut = rut.trim();
        if trimmed_rut.is_empty() {
            return Err(RegistrationValidationError::EmptyRut);
        }
        let credentials = LoginCredentials::try_from_parts(email.trim(), password)?;
        Ok(Self {
            full_name: name.to_owned(),
            rut: trimmed_rut.to_owned(),
            credentials,
        })
    }

    /// Login email for the new account.
    #[must_use]
    pub fn email(&self) -> &str {
        self.credentials.email()
    }
}

fn map_provisioning_error(error: DoctorProvisioningError) -> Error {
    match error {
        DoctorProvisioningError::Connection { message } => Error::service_unavailable(message),
        err @ DoctorProvisioningError::DuplicateEmail { .. } => Error::invalid_request(err.to_string()),
        DoctorProvisioningError::Query { message } => Error::transaction_failed(message),
    }
}

/// Hashes the password and provisions user + doctor rows atomically.
#[derive(Clone)]
pub struct DoctorOnboardingService {
    provisioning: Arc<dyn DoctorProvisioning>,
}

impl DoctorOnboardingService {
    /// Create the service over a provisioning adapter.
    #[must_use]
    pub fn new(provisioning: Arc<dyn DoctorProvisioning>) -> Self {
        Self { provisioning }
    }

    /// Register a doctor. New accounts always carry the `doctor` role.
    pub async fn register(
        &self,
        registration: &DoctorRegistration,
    ) -> Result<ProvisionedDoctor, Error> {
        let password_hash = Zeroizing::new(
            hash_password(registration.credentials.password())
                .map_err(|err| Error::internal(err.to_string()))?,
        );
        let account = NewDoctorAccount {
            full_name: registration.full_name.clone(),
            rut: registration.rut.clone(),
            email: registration.email().to_owned(),
            password_hash: password_hash.to_string(),
        };

        let provisioned = self
            .provisioning
            .provision(&account)
            .await
            .map_err(map_provisioning_error)?;
        info!(
            user_id = %provisioned.user_id,
            doctor_id = provisioned.doctor_id.get(),
            role = %Role::Doctor,
            "doctor account provisioned"
        );
        Ok(provisioned)
    }
}
