//! The visit write path.
//!
//! [`apply_visit`] is the ordered step sequence run inside one transaction:
//!
//! 1. resolve the patient by rut, inserting it on first sight;
//! 2. resolve the session user's doctor profile (missing is fatal);
//! 3. insert the visit;
//! 4. insert its treatment;
//! 5. insert the lab row when the draft carries one.
//!
//! Every step returns a `Result`; the first `Err` stops the sequence and the
//! store's transaction driver rolls everything back, including a patient
//! created in step 1.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::ports::{VisitRecorder, VisitStore, VisitStoreError, VisitTransaction};
use super::{
    Error, PatientId, PatientIdentity, RecordedVisit, StaffSession, UserId, VisitDraft,
    VisitSubmission,
};

/// Message carried by the dependency failure when no doctor row exists.
pub const DOCTOR_PROFILE_MISSING: &str = "doctor profile not found for this user";

/// Map step failures inside the transaction.
pub(crate) fn map_visit_store_error(error: VisitStoreError) -> Error {
    match error {
        VisitStoreError::Connection { message } => Error::service_unavailable(message),
        VisitStoreError::Query { message } => Error::transaction_failed(message),
    }
}

async fn resolve_patient<T>(
    tx: &mut T,
    patient: &PatientIdentity,
) -> Result<(PatientId, bool), Error>
where
    T: VisitTransaction + ?Sized,
{
    if let Some(id) = tx
        .find_patient_by_rut(&patient.rut)
        .await
        .map_err(map_visit_store_error)?
    {
        return Ok((id, false));
    }

    if let Some(id) = tx
        .insert_patient(&patient.full_name, &patient.rut)
        .await
        .map_err(map_visit_store_error)?
    {
        return Ok((id, true));
    }

    // A concurrent visit inserted the same rut between our read and insert.
    tx.find_patient_by_rut(&patient.rut)
        .await
        .map_err(map_visit_store_error)?
        .map(|id| (id, false))
        .ok_or_else(|| Error::transaction_failed("patient row vanished after rut conflict"))
}

/// Run the visit steps against an open transaction.
///
/// # Errors
/// - [`ErrorCode::DependencyMissing`](super::ErrorCode::DependencyMissing)
///   when `user_id` has no doctor profile.
/// - [`ErrorCode::TransactionFailed`](super::ErrorCode::TransactionFailed) or
///   [`ErrorCode::ServiceUnavailable`](super::ErrorCode::ServiceUnavailable)
///   when a step fails.
pub async fn apply_visit<T>(
    tx: &mut T,
    user_id: UserId,
    draft: &VisitDraft,
) -> Result<RecordedVisit, Error>
where
    T: VisitTransaction + ?Sized,
{
    let (patient_id, patient_created) = resolve_patient(tx, &draft.patient).await?;

    let doctor = tx
        .find_doctor_by_user(user_id)
        .await
        .map_err(map_visit_store_error)?
        .ok_or_else(|| Error::dependency_missing(DOCTOR_PROFILE_MISSING))?;

    let visit_id = tx
        .insert_visit(draft.date, &doctor, patient_id)
        .await
        .map_err(map_visit_store_error)?;

    let treatment_id = tx
        .insert_treatment(&draft.treatment_name, draft.treatment_cost, visit_id)
        .await
        .map_err(map_visit_store_error)?;

    let lab_id = match &draft.lab {
        Some(lab) => Some(
            tx.insert_lab(&lab.name, lab.cost, treatment_id)
                .await
                .map_err(map_visit_store_error)?,
        ),
        None => None,
    };

    Ok(RecordedVisit {
        patient_id,
        patient_created,
        visit_id,
        treatment_id,
        lab_id,
    })
}

/// Records visits for doctor sessions.
#[derive(Clone)]
pub struct VisitRecorderService {
    store: Arc<dyn VisitStore>,
}

impl VisitRecorderService {
    /// Create the service over a transactional visit store.
    #[must_use]
    pub const fn new(store: Arc<dyn VisitStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VisitRecorder for VisitRecorderService {
    async fn record_visit(
        &self,
        session: &StaffSession,
        form: VisitSubmission,
    ) -> Result<RecordedVisit, Error> {
        if !session.is_doctor() {
            return Err(Error::forbidden("only doctors may record visits"));
        }

        let draft = VisitDraft::try_from_submission(form)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        match self.store.record(session.user_id, &draft).await {
            Ok(recorded) => {
                info!(
                    user_id = %session.user_id,
                    patient_id = %recorded.patient_id,
                    patient_created = recorded.patient_created,
                    visit_id = %recorded.visit_id,
                    treatment_id = %recorded.treatment_id,
                    lab = recorded.lab_id.is_some(),
                    "visit recorded"
                );
                Ok(recorded)
            }
            Err(error) => {
                warn!(
                    user_id = %session.user_id,
                    code = %error.code(),
                    error = %error,
                    "visit recording rolled back"
                );
                Err(error)
            }
        }
    }
}
