//! Port for reading staff accounts and doctor profiles.

use async_trait::async_trait;

use crate::domain::{DoctorProfile, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by staff directory adapters.
    pub enum StaffDirectoryError {
        /// The store could not be reached.
        Connection { message: String } => "staff directory connection failed: {message}",
        /// A lookup failed during execution.
        Query { message: String } => "staff directory query failed: {message}",
    }
}

/// Read access to staff accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Find a user account by exact email.
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, StaffDirectoryError>;

    /// Find the doctor profile linked to a user account.
    async fn find_doctor_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<DoctorProfile>, StaffDirectoryError>;
}
