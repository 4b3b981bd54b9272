//! PostgreSQL-backed `StaffDirectory` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StaffDirectory, StaffDirectoryError};
use crate::domain::{DoctorProfile, UserAccount, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DoctorRow, UserRow};
use super::pool::DbPool;
use super::schema::{doctores, usuarios};

/// Diesel-backed staff lookups used at login.
#[derive(Clone)]
pub struct DieselStaffDirectory {
    pool: DbPool,
}

impl DieselStaffDirectory {
    /// Create a new directory with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> StaffDirectoryError {
    map_diesel_error(
        error,
        StaffDirectoryError::query,
        StaffDirectoryError::connection,
    )
}

#[async_trait]
impl StaffDirectory for DieselStaffDirectory {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, StaffDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StaffDirectoryError::connection))?;

        let row = usuarios::table
            .filter(usuarios::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        Ok(row.map(UserAccount::from))
    }

    async fn find_doctor_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<DoctorProfile>, StaffDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, StaffDirectoryError::connection))?;

        let row = doctores::table
            .filter(doctores::id_usuario.eq(user_id.get()))
            .select(DoctorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        Ok(row.map(DoctorProfile::from))
    }
}
