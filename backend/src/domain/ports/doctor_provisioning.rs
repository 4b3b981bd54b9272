//! Port for creating doctor accounts out of band.

use async_trait::async_trait;

use crate::domain::{DoctorId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by doctor provisioning adapters.
    pub enum DoctorProvisioningError {
        /// The store could not be reached.
        Connection { message: String } => "doctor provisioning connection failed: {message}",
        /// The email is already registered.
        DuplicateEmail { email: String } => "email {email} is already registered",
        /// An insert failed; nothing was written.
        Query { message: String } => "doctor provisioning query failed: {message}",
    }
}

/// A doctor account ready to persist; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctorAccount {
    /// Doctor's full name.
    pub full_name: String,
    /// Doctor's RUT.
    pub rut: String,
    /// Login email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Identifiers of a freshly provisioned doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionedDoctor {
    /// New `usuarios` row.
    pub user_id: UserId,
    /// New `doctores` row.
    pub doctor_id: DoctorId,
}

/// Inserts the user and doctor rows in one transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorProvisioning: Send + Sync {
    /// Persist the account; on failure neither row remains.
    async fn provision(
        &self,
        account: &NewDoctorAccount,
    ) -> Result<ProvisionedDoctor, DoctorProvisioningError>;
}
