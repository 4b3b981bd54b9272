//! Domain primitives, services and ports.
//!
//! Purpose: keep clinic rules (who may log in, which dashboard a role sees,
//! how a visit is written) free of HTTP and SQL. Adapters in `inbound` and
//! `outbound` plug into the traits in [`ports`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failures.
//! - `LoginCredentials`, `StaffLoginService`: authentication.
//! - `resolve_dashboard`: role dispatch.
//! - `VisitDraft`, `apply_visit`, `VisitRecorderService`: the visit write path.
//! - `DoctorRegistration`, `DoctorOnboardingService`: provisioning.

pub mod auth;
pub mod dashboard;
pub mod doctor_onboarding;
pub mod error;
pub mod ports;
pub mod staff;
pub mod staff_login;
pub mod trace_id;
pub mod visit;
pub mod visit_recording;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordCheck, PasswordHashError, decoy_hash,
    hash_password, verify_password,
};
pub use self::dashboard::{DashboardRoute, resolve_dashboard};
pub use self::doctor_onboarding::{
    DoctorOnboardingService, DoctorRegistration, RegistrationValidationError,
};
pub use self::error::{DomainError, DomainError as Error, ErrorCode, ErrorValidationError};
pub use self::staff::{
    AuthenticatedStaff, DoctorId, DoctorProfile, FALLBACK_DOCTOR_NAME, Role, StaffSession,
    UserAccount, UserId, first_name,
};
pub use self::staff_login::StaffLoginService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::visit::{
    LabDraft, LabId, PatientId, PatientIdentity, RecordedVisit, TreatmentId, VISIT_DATE_FORMAT,
    VisitDraft, VisitId, VisitSubmission, VisitValidationError,
};
pub use self::visit_recording::{DOCTOR_PROFILE_MISSING, VisitRecorderService, apply_visit};
