//! Visit ("atención") drafts and their validation.
//!
//! A [`VisitSubmission`] is the raw form as typed by the doctor. Converting it
//! into a [`VisitDraft`] parses every number and date up front, so nothing
//! malformed ever reaches the transaction.

use chrono::NaiveDate;

/// Date format produced by HTML `<input type="date">`.
pub const VISIT_DATE_FORMAT: &str = "%Y-%m-%d";

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database identifier.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Raw database identifier.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Primary key of a row in `pacientes`.
    PatientId
);
row_id!(
    /// Primary key of a row in `atenciones`.
    VisitId
);
row_id!(
    /// Primary key of a row in `tratamientos`.
    TreatmentId
);
row_id!(
    /// Primary key of a row in `laboratorios`.
    LabId
);

/// Raw visit form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitSubmission {
    /// Patient's full name.
    pub patient_name: String,
    /// Patient's RUT; identifies the patient across visits.
    pub patient_rut: String,
    /// Visit date as `YYYY-MM-DD`.
    pub visit_date: String,
    /// Treatment performed.
    pub treatment_name: String,
    /// Treatment cost as typed.
    pub treatment_cost: String,
    /// The "there was lab work" checkbox.
    pub lab_requested: bool,
    /// Lab work description, when sent.
    pub lab_name: Option<String>,
    /// Lab cost as typed, when sent.
    pub lab_cost: Option<String>,
}

/// Reasons a submission cannot become a [`VisitDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    MissingField {
        /// Field label.
        field: &'static str,
    },
    /// A cost was not a whole number.
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidCost {
        /// Field label.
        field: &'static str,
        /// Offending input, trimmed.
        value: String,
    },
    /// A cost was below zero.
    #[error("{field} must not be negative")]
    NegativeCost {
        /// Field label.
        field: &'static str,
    },
    /// The date did not parse.
    #[error("visit date must use YYYY-MM-DD, got '{value}'")]
    InvalidDate {
        /// Offending input, trimmed.
        value: String,
    },
}

/// Patient identity as submitted; `rut` is the deduplication key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientIdentity {
    /// Name stored when the patient is first seen.
    pub full_name: String,
    /// Unique patient key.
    pub rut: String,
}

/// Lab work billed alongside the treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabDraft {
    /// Lab work description.
    pub name: String,
    /// Non-negative cost.
    pub cost: i32,
}

/// A validated visit ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDraft {
    /// Who was seen.
    pub patient: PatientIdentity,
    /// Day of the visit.
    pub date: NaiveDate,
    /// Treatment performed.
    pub treatment_name: String,
    /// Non-negative treatment cost.
    pub treatment_cost: i32,
    /// Lab work tied to the treatment, if any.
    pub lab: Option<LabDraft>,
}

impl VisitDraft {
    /// Validate and parse a raw submission.
    ///
    /// Lab work is only included when the checkbox is set and both lab name
    /// and cost are non-empty; in that case a malformed lab cost fails the
    /// whole submission.
    ///
    /// # Examples
    /// ```
    /// use clinica::domain::{VisitDraft, VisitSubmission};
    ///
    /// let draft = VisitDraft::try_from_submission(VisitSubmission {
    ///     patient_name: "Ana".into(),
    ///     patient_rut: "1-9".into(),
    ///     visit_date: "2024-01-01".into(),
    ///     treatment_name: "Limpieza".into(),
    ///     treatment_cost: "5000".into(),
    ///     ..VisitSubmission::default()
    /// })
    /// .unwrap();
    /// assert_eq!(draft.treatment_cost, 5000);
    /// assert!(draft.lab.is_none());
    /// ```
    pub fn try_from_submission(form: VisitSubmission) -> Result<Self, VisitValidationError> {
        let full_name = required("patient name", &form.patient_name)?;
        let rut = required("patient rut", &form.patient_rut)?;
        let date = parse_date(&form.visit_date)?;
        let treatment_name = required("treatment name", &form.treatment_name)?;
        let treatment_cost = parse_cost("treatment cost", &form.treatment_cost)?;

        let lab = match (form.lab_requested, non_blank(form.lab_name), non_blank(form.lab_cost)) {
            (true, Some(name), Some(cost)) => Some(LabDraft {
                cost: parse_cost("lab cost", &cost)?,
                name,
            }),
            _ => None,
        };

        Ok(Self {
            patient: PatientIdentity { full_name, rut },
            date,
            treatment_name,
            treatment_cost,
            lab,
        })
    }
}

fn required(field: &'static str, raw: &str) -> Result<String, VisitValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VisitValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_cost(field: &'static str, raw: &str) -> Result<i32, VisitValidationError> {
    let trimmed = raw.trim();
    let cost = trimmed
        .parse::<i32>()
        .map_err(|_| VisitValidationError::InvalidCost {
            field,
            value: trimmed.to_owned(),
        })?;
    if cost < 0 {
        return Err(VisitValidationError::NegativeCost { field });
    }
    Ok(cost)
}

fn parse_date(raw: &str) -> Result<NaiveDate, VisitValidationError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, VISIT_DATE_FORMAT).map_err(|_| {
        VisitValidationError::InvalidDate {
            value: trimmed.to_owned(),
        }
    })
}

/// Identifiers produced by a committed visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedVisit {
    /// Patient the visit belongs to.
    pub patient_id: PatientId,
    /// `true` when the patient row was created by this visit.
    pub patient_created: bool,
    /// New `atenciones` row.
    pub visit_id: VisitId,
    /// New `tratamientos` row.
    pub treatment_id: TreatmentId,
    /// New `laboratorios` row, when lab work was recorded.
    pub lab_id: Option<LabId>,
}
