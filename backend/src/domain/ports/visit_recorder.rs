//! Driving port for recording visits.

use async_trait::async_trait;

use crate::domain::{Error, RecordedVisit, StaffSession, VisitSubmission};

/// Domain use-case port: record a visit on behalf of the session's doctor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRecorder: Send + Sync {
    /// Validate `form` and persist patient, visit, treatment and optional lab
    /// atomically.
    async fn record_visit(
        &self,
        session: &StaffSession,
        form: VisitSubmission,
    ) -> Result<RecordedVisit, Error>;
}
