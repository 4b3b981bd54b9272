//! Test utilities for the clinic crate.
//!
//! [`InMemoryClinic`] implements every driven port over in-process tables so
//! unit tests (in `src/`) and integration tests (in `tests/`) can exercise
//! the real services without PostgreSQL. Visit transactions work on a
//! snapshot that is written back only when every step succeeds.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    DoctorProvisioning, DoctorProvisioningError, NewDoctorAccount, ProvisionedDoctor,
    StaffDirectory, StaffDirectoryError, VisitStore, VisitStoreError, VisitTransaction,
};
use crate::domain::{
    DoctorId, DoctorProfile, Error, LabId, PatientId, RecordedVisit, Role, TreatmentId,
    UserAccount, UserId, VisitDraft, VisitId, apply_visit, hash_password,
};

/// Visit step that should fail on the next transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingStep {
    /// Patient insert.
    InsertPatient,
    /// Visit insert.
    InsertVisit,
    /// Treatment insert.
    InsertTreatment,
    /// Lab insert.
    InsertLab,
}

impl FailingStep {
    const fn label(self) -> &'static str {
        match self {
            Self::InsertPatient => "insert_patient",
            Self::InsertVisit => "insert_visit",
            Self::InsertTreatment => "insert_treatment",
            Self::InsertLab => "insert_lab",
        }
    }
}

/// Stored patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRow {
    /// Row id.
    pub id: PatientId,
    /// Patient name as first recorded.
    pub full_name: String,
    /// Unique RUT.
    pub rut: String,
}

/// Stored visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRow {
    /// Row id.
    pub id: VisitId,
    /// Visit date.
    pub date: NaiveDate,
    /// Attending doctor.
    pub doctor_id: DoctorId,
    /// Patient seen.
    pub patient_id: PatientId,
}

/// Stored treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentRow {
    /// Row id.
    pub id: TreatmentId,
    /// Treatment name.
    pub name: String,
    /// Cost in whole pesos.
    pub cost: i32,
    /// Owning visit.
    pub visit_id: VisitId,
}

/// Stored lab order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabRow {
    /// Row id.
    pub id: LabId,
    /// Lab name.
    pub name: String,
    /// Cost in whole pesos.
    pub cost: i32,
    /// Owning treatment.
    pub treatment_id: TreatmentId,
}

/// Row counts of the visit-related tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    /// `pacientes` rows.
    pub patients: usize,
    /// `atenciones` rows.
    pub visits: usize,
    /// `tratamientos` rows.
    pub treatments: usize,
    /// `laboratorios` rows.
    pub labs: usize,
}

impl TableCounts {
    /// True when no visit-related row exists.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.patients == 0 && self.visits == 0 && self.treatments == 0 && self.labs == 0
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Vec<UserAccount>,
    doctors: Vec<DoctorProfile>,
    patients: Vec<PatientRow>,
    visits: Vec<VisitRow>,
    treatments: Vec<TreatmentRow>,
    labs: Vec<LabRow>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
struct ClinicState {
    tables: Tables,
    failing: Option<FailingStep>,
    concurrent_patient: Option<PatientRow>,
    unreachable: bool,
}

/// In-memory clinic database.
///
/// Clones share the same tables. Visit transactions are serialised.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClinic {
    state: Arc<Mutex<ClinicState>>,
    writer: Arc<tokio::sync::Mutex<()>>,
}

impl InMemoryClinic {
    /// Create an empty clinic.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ClinicState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a user row with an Argon2 hash of `password`.
    ///
    /// # Panics
    /// Panics if hashing fails.
    #[expect(clippy::expect_used, reason = "test fixture helper")]
    pub fn add_user(&self, email: &str, password: &str, role: &str) -> UserId {
        let password_hash = hash_password(password).expect("hash fixture password");
        self.add_user_with_hash(email, &password_hash, role)
    }

    /// Add a user row with a pre-computed (possibly malformed) hash.
    pub fn add_user_with_hash(&self, email: &str, password_hash: &str, role: &str) -> UserId {
        let mut state = self.lock();
        let id = UserId::new(state.tables.next_id());
        state.tables.users.push(UserAccount {
            id,
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            role: role.to_owned(),
        });
        id
    }

    /// Add a doctor profile linked to `user_id`.
    pub fn add_doctor(&self, user_id: UserId, full_name: &str, rut: &str) -> DoctorId {
        let mut state = self.lock();
        let id = DoctorId::new(state.tables.next_id());
        state.tables.doctors.push(DoctorProfile {
            id,
            full_name: full_name.to_owned(),
            rut: rut.to_owned(),
            user_id,
        });
        id
    }

    /// Add a doctor-role user together with its profile.
    pub fn add_doctor_account(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        rut: &str,
    ) -> UserId {
        let user_id = self.add_user(email, password, Role::Doctor.as_str());
        self.add_doctor(user_id, full_name, rut);
        user_id
    }

    /// Make the next visit transaction fail at `step`.
    pub fn fail_at(&self, step: FailingStep) {
        self.lock().failing = Some(step);
    }

    /// Make every port report a connection failure until reset.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// Simulate another writer inserting `rut` between the next transaction's
    /// patient lookup and its insert. Returns the id that writer obtains.
    pub fn insert_patient_concurrently_on_next_lookup(
        &self,
        rut: &str,
        full_name: &str,
    ) -> PatientId {
        let mut state = self.lock();
        let id = PatientId::new(state.tables.next_id());
        state.concurrent_patient = Some(PatientRow {
            id,
            full_name: full_name.to_owned(),
            rut: rut.to_owned(),
        });
        id
    }

    /// Current row counts.
    #[must_use]
    pub fn counts(&self) -> TableCounts {
        let state = self.lock();
        TableCounts {
            patients: state.tables.patients.len(),
            visits: state.tables.visits.len(),
            treatments: state.tables.treatments.len(),
            labs: state.tables.labs.len(),
        }
    }

    /// Snapshot of every user row.
    #[must_use]
    pub fn users(&self) -> Vec<UserAccount> {
        self.lock().tables.users.clone()
    }

    /// Snapshot of every doctor profile row.
    #[must_use]
    pub fn doctors(&self) -> Vec<DoctorProfile> {
        self.lock().tables.doctors.clone()
    }

    /// Snapshot of every patient row.
    #[must_use]
    pub fn patients(&self) -> Vec<PatientRow> {
        self.lock().tables.patients.clone()
    }

    /// Snapshot of every visit row.
    #[must_use]
    pub fn visits(&self) -> Vec<VisitRow> {
        self.lock().tables.visits.clone()
    }

    /// Snapshot of every treatment row.
    #[must_use]
    pub fn treatments(&self) -> Vec<TreatmentRow> {
        self.lock().tables.treatments.clone()
    }

    /// Snapshot of every lab row.
    #[must_use]
    pub fn labs(&self) -> Vec<LabRow> {
        self.lock().tables.labs.clone()
    }
}

/// Snapshot-backed transaction handed to [`apply_visit`].
struct InMemoryTransaction {
    tables: Tables,
    failing: Option<FailingStep>,
    concurrent_patient: Option<PatientRow>,
    /// Row committed by the simulated concurrent writer; survives rollback.
    landed_patient: Option<PatientRow>,
}

impl InMemoryTransaction {
    fn check(&self, step: FailingStep) -> Result<(), VisitStoreError> {
        if self.failing == Some(step) {
            return Err(VisitStoreError::query(format!(
                "injected failure at {}",
                step.label()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VisitTransaction for InMemoryTransaction {
    async fn find_patient_by_rut(
        &mut self,
        rut: &str,
    ) -> Result<Option<PatientId>, VisitStoreError> {
        let found = self
            .tables
            .patients
            .iter()
            .find(|patient| patient.rut == rut)
            .map(|patient| patient.id);
        if found.is_some() {
            return Ok(found);
        }
        if let Some(row) = self
            .concurrent_patient
            .take_if(|pending| pending.rut == rut)
        {
            self.tables.patients.push(row.clone());
            self.landed_patient = Some(row);
        }
        Ok(None)
    }

    async fn insert_patient(
        &mut self,
        full_name: &str,
        rut: &str,
    ) -> Result<Option<PatientId>, VisitStoreError> {
        self.check(FailingStep::InsertPatient)?;
        if self.tables.patients.iter().any(|patient| patient.rut == rut) {
            return Ok(None);
        }
        let id = PatientId::new(self.tables.next_id());
        self.tables.patients.push(PatientRow {
            id,
            full_name: full_name.to_owned(),
            rut: rut.to_owned(),
        });
        Ok(Some(id))
    }

    async fn find_doctor_by_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<DoctorProfile>, VisitStoreError> {
        Ok(self
            .tables
            .doctors
            .iter()
            .find(|doctor| doctor.user_id == user_id)
            .cloned())
    }

    async fn insert_visit(
        &mut self,
        date: NaiveDate,
        doctor: &DoctorProfile,
        patient_id: PatientId,
    ) -> Result<VisitId, VisitStoreError> {
        self.check(FailingStep::InsertVisit)?;
        let id = VisitId::new(self.tables.next_id());
        self.tables.visits.push(VisitRow {
            id,
            date,
            doctor_id: doctor.id,
            patient_id,
        });
        Ok(id)
    }

    async fn insert_treatment(
        &mut self,
        name: &str,
        cost: i32,
        visit_id: VisitId,
    ) -> Result<TreatmentId, VisitStoreError> {
        self.check(FailingStep::InsertTreatment)?;
        let id = TreatmentId::new(self.tables.next_id());
        self.tables.treatments.push(TreatmentRow {
            id,
            name: name.to_owned(),
            cost,
            visit_id,
        });
        Ok(id)
    }

    async fn insert_lab(
        &mut self,
        name: &str,
        cost: i32,
        treatment_id: TreatmentId,
    ) -> Result<LabId, VisitStoreError> {
        self.check(FailingStep::InsertLab)?;
        let id = LabId::new(self.tables.next_id());
        self.tables.labs.push(LabRow {
            id,
            name: name.to_owned(),
            cost,
            treatment_id,
        });
        Ok(id)
    }
}

#[async_trait]
impl VisitStore for InMemoryClinic {
    async fn record(&self, user_id: UserId, draft: &VisitDraft) -> Result<RecordedVisit, Error> {
        let _writer = self.writer.lock().await;
        let mut tx = {
            let mut state = self.lock();
            if state.unreachable {
                return Err(Error::service_unavailable("clinic store unreachable"));
            }
            InMemoryTransaction {
                tables: state.tables.clone(),
                failing: state.failing.take(),
                concurrent_patient: state.concurrent_patient.take(),
                landed_patient: None,
            }
        };

        let outcome = apply_visit(&mut tx, user_id, draft).await;

        let mut state = self.lock();
        match &outcome {
            Ok(_) => state.tables = tx.tables,
            Err(_) => {
                if let Some(row) = tx.landed_patient {
                    state.tables.last_id = state.tables.last_id.max(row.id.get());
                    state.tables.patients.push(row);
                }
            }
        }
        outcome
    }
}

#[async_trait]
impl StaffDirectory for InMemoryClinic {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, StaffDirectoryError> {
        let state = self.lock();
        if state.unreachable {
            return Err(StaffDirectoryError::connection("clinic store unreachable"));
        }
        Ok(state
            .tables
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_doctor_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<DoctorProfile>, StaffDirectoryError> {
        let state = self.lock();
        if state.unreachable {
            return Err(StaffDirectoryError::connection("clinic store unreachable"));
        }
        Ok(state
            .tables
            .doctors
            .iter()
            .find(|doctor| doctor.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl DoctorProvisioning for InMemoryClinic {
    async fn provision(
        &self,
        account: &NewDoctorAccount,
    ) -> Result<ProvisionedDoctor, DoctorProvisioningError> {
        let mut state = self.lock();
        if state.unreachable {
            return Err(DoctorProvisioningError::connection(
                "clinic store unreachable",
            ));
        }
        if state
            .tables
            .users
            .iter()
            .any(|user| user.email == account.email)
        {
            return Err(DoctorProvisioningError::duplicate_email(
                account.email.as_str(),
            ));
        }

        let user_id = UserId::new(state.tables.next_id());
        state.tables.users.push(UserAccount {
            id: user_id,
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            role: Role::Doctor.as_str().to_owned(),
        });
        let doctor_id = DoctorId::new(state.tables.next_id());
        state.tables.doctors.push(DoctorProfile {
            id: doctor_id,
            full_name: account.full_name.clone(),
            rut: account.rut.clone(),
            user_id,
        });
        Ok(ProvisionedDoctor { user_id, doctor_id })
    }
}
