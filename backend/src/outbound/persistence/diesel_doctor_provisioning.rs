//! PostgreSQL-backed `DoctorProvisioning` adapter.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{
    DoctorProvisioning, DoctorProvisioningError, NewDoctorAccount, ProvisionedDoctor,
};
use crate::domain::{DoctorId, Role, UserId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewDoctorRow, NewUserRow};
use super::pool::DbPool;
use super::schema::{doctores, usuarios};

/// Inserts a doctor-role account and its profile in one transaction.
#[derive(Clone)]
pub struct DieselDoctorProvisioning {
    pool: DbPool,
}

impl DieselDoctorProvisioning {
    /// Create a new adapter with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error, email: &str) -> DoctorProvisioningError {
    if is_unique_violation(&error) {
        return DoctorProvisioningError::duplicate_email(email);
    }
    map_diesel_error(
        error,
        DoctorProvisioningError::query,
        DoctorProvisioningError::connection,
    )
}

#[async_trait]
impl DoctorProvisioning for DieselDoctorProvisioning {
    async fn provision(
        &self,
        account: &NewDoctorAccount,
    ) -> Result<ProvisionedDoctor, DoctorProvisioningError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, DoctorProvisioningError::connection))?;

        conn.transaction(|conn| {
            async move {
                let user_id = diesel::insert_into(usuarios::table)
                    .values(&NewUserRow {
                        email: &account.email,
                        password: &account.password_hash,
                        rol: Role::Doctor.as_str(),
                    })
                    .returning(usuarios::id_usuario)
                    .get_result::<i32>(conn)
                    .await?;

                let doctor_id = diesel::insert_into(doctores::table)
                    .values(&NewDoctorRow {
                        nombre_completo: &account.full_name,
                        rut: &account.rut,
                        id_usuario: user_id,
                    })
                    .returning(doctores::id_doctor)
                    .get_result::<i32>(conn)
                    .await?;

                Ok::<_, diesel::result::Error>(ProvisionedDoctor {
                    user_id: UserId::new(user_id),
                    doctor_id: DoctorId::new(doctor_id),
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_error(err, &account.email))
    }
}
