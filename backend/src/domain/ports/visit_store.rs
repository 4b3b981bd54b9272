//! Ports for the transactional visit write path.
//!
//! The domain owns the step sequence (see [`crate::domain::apply_visit`]);
//! adapters own the transaction. [`VisitStore::record`] must open a
//! transaction, hand a [`VisitTransaction`] to `apply_visit`, commit on `Ok`
//! and roll back on `Err`, so a failed visit leaves no rows behind.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    DoctorProfile, Error, LabId, PatientId, RecordedVisit, TreatmentId, UserId, VisitDraft,
    VisitId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by individual steps inside a visit transaction.
    pub enum VisitStoreError {
        /// The connection dropped or could not be acquired.
        Connection { message: String } => "visit store connection failed: {message}",
        /// A statement failed; the transaction will be rolled back.
        Query { message: String } => "visit store query failed: {message}",
    }
}

/// Step primitives available inside one open transaction.
#[async_trait]
pub trait VisitTransaction: Send {
    /// Look up a patient by rut.
    async fn find_patient_by_rut(&mut self, rut: &str) -> Result<Option<PatientId>, VisitStoreError>;

    /// Insert a patient unless the rut already exists.
    ///
    /// Returns `None` when another writer created the rut first; the caller
    /// re-reads it.
    async fn insert_patient(
        &mut self,
        full_name: &str,
        rut: &str,
    ) -> Result<Option<PatientId>, VisitStoreError>;

    /// Look up the doctor profile linked to a user account.
    async fn find_doctor_by_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<DoctorProfile>, VisitStoreError>;

    /// Insert a visit row.
    async fn insert_visit(
        &mut self,
        date: NaiveDate,
        doctor: &DoctorProfile,
        patient_id: PatientId,
    ) -> Result<VisitId, VisitStoreError>;

    /// Insert the visit's treatment row.
    async fn insert_treatment(
        &mut self,
        name: &str,
        cost: i32,
        visit_id: VisitId,
    ) -> Result<TreatmentId, VisitStoreError>;

    /// Insert a lab row for a treatment.
    async fn insert_lab(
        &mut self,
        name: &str,
        cost: i32,
        treatment_id: TreatmentId,
    ) -> Result<LabId, VisitStoreError>;
}

/// Transaction driver for the visit write path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Run the visit steps for `user_id` inside a single transaction.
    async fn record(&self, user_id: UserId, draft: &VisitDraft) -> Result<RecordedVisit, Error>;
}
