//! PostgreSQL-backed `VisitStore` adapter.
//!
//! [`DieselVisitStore::record`] opens a Diesel transaction and runs
//! [`apply_visit`] against a [`VisitTransaction`] bound to that connection.
//! Any step error aborts the closure, so Diesel rolls every insert back.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{VisitStore, VisitStoreError, VisitTransaction};
use crate::domain::visit_recording::map_visit_store_error;
use crate::domain::{
    DoctorProfile, Error, LabId, PatientId, RecordedVisit, TreatmentId, UserId, VisitDraft,
    VisitId, apply_visit,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DoctorRow, NewLabRow, NewPatientRow, NewTreatmentRow, NewVisitRow};
use super::pool::DbPool;
use super::schema::{atenciones, doctores, laboratorios, pacientes, tratamientos};

/// Diesel-backed transactional visit writer.
#[derive(Clone)]
pub struct DieselVisitStore {
    pool: DbPool,
}

impl DieselVisitStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> VisitStoreError {
    map_diesel_error(error, VisitStoreError::query, VisitStoreError::connection)
}

/// Why a visit transaction was rolled back.
#[derive(Debug)]
enum TxAbort {
    /// Diesel failed to begin, commit or roll back.
    Database(diesel::result::Error),
    /// A step inside [`apply_visit`] failed.
    Domain(Error),
}

impl From<diesel::result::Error> for TxAbort {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

/// Step primitives bound to one open PostgreSQL transaction.
struct DieselVisitTransaction<'c> {
    conn: &'c mut AsyncPgConnection,
}

#[async_trait]
impl VisitTransaction for DieselVisitTransaction<'_> {
    async fn find_patient_by_rut(
        &mut self,
        rut: &str,
    ) -> Result<Option<PatientId>, VisitStoreError> {
        pacientes::table
            .filter(pacientes::rut.eq(rut))
            .select(pacientes::id_paciente)
            .first::<i32>(&mut *self.conn)
            .await
            .optional()
            .map(|id| id.map(PatientId::new))
            .map_err(map_error)
    }

    async fn insert_patient(
        &mut self,
        full_name: &str,
        rut: &str,
    ) -> Result<Option<PatientId>, VisitStoreError> {
        let row = NewPatientRow {
            nombre_completo: full_name,
            rut,
        };
        let inserted = diesel::insert_into(pacientes::table)
            .values(&row)
            .on_conflict(pacientes::rut)
            .do_nothing()
            .returning(pacientes::id_paciente)
            .get_result::<i32>(&mut *self.conn)
            .await
            .optional()
            .map_err(map_error)?;
        if inserted.is_none() {
            debug!("patient rut already present; conflict resolved by re-read");
        }
        Ok(inserted.map(PatientId::new))
    }

    async fn find_doctor_by_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<DoctorProfile>, VisitStoreError> {
        doctores::table
            .filter(doctores::id_usuario.eq(user_id.get()))
            .select(DoctorRow::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map(|row| row.map(DoctorProfile::from))
            .map_err(map_error)
    }

    async fn insert_visit(
        &mut self,
        date: NaiveDate,
        doctor: &DoctorProfile,
        patient_id: PatientId,
    ) -> Result<VisitId, VisitStoreError> {
        let row = NewVisitRow {
            fecha_atencion: date,
            id_doctor: doctor.id.get(),
            id_paciente: patient_id.get(),
        };
        diesel::insert_into(atenciones::table)
            .values(&row)
            .returning(atenciones::id_atencion)
            .get_result::<i32>(&mut *self.conn)
            .await
            .map(VisitId::new)
            .map_err(map_error)
    }

    async fn insert_treatment(
        &mut self,
        name: &str,
        cost: i32,
        visit_id: VisitId,
    ) -> Result<TreatmentId, VisitStoreError> {
        let row = NewTreatmentRow {
            nombre_tratamiento: name,
            costo_tratamiento: cost,
            id_atencion: visit_id.get(),
        };
        diesel::insert_into(tratamientos::table)
            .values(&row)
            .returning(tratamientos::id_tratamiento)
            .get_result::<i32>(&mut *self.conn)
            .await
            .map(TreatmentId::new)
            .map_err(map_error)
    }

    async fn insert_lab(
        &mut self,
        name: &str,
        cost: i32,
        treatment_id: TreatmentId,
    ) -> Result<LabId, VisitStoreError> {
        let row = NewLabRow {
            nombre_laboratorio: name,
            costo_laboratorio: cost,
            id_tratamiento: treatment_id.get(),
        };
        diesel::insert_into(laboratorios::table)
            .values(&row)
            .returning(laboratorios::id_laboratorio)
            .get_result::<i32>(&mut *self.conn)
            .await
            .map(LabId::new)
            .map_err(map_error)
    }
}

#[async_trait]
impl VisitStore for DieselVisitStore {
    async fn record(&self, user_id: UserId, draft: &VisitDraft) -> Result<RecordedVisit, Error> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_visit_store_error(map_pool_error(err, VisitStoreError::connection)))?;

        conn.transaction(|conn| {
            async move {
                let mut tx = DieselVisitTransaction { conn };
                apply_visit(&mut tx, user_id, draft)
                    .await
                    .map_err(TxAbort::Domain)
            }
            .scope_boxed()
        })
        .await
        .map_err(|abort| match abort {
            TxAbort::Domain(error) => error,
            TxAbort::Database(error) => map_visit_store_error(map_error(error)),
        })
    }
}
