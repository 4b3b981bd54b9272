//! Visit recording form.
//!
//! ```text
//! GET  /crear_atencion
//! POST /crear_atencion   paciente_nombre=..&paciente_rut=..&fecha_atencion=..
//!                        &tratamiento_nombre=..&tratamiento_costo=..
//!                        [&hubo_laboratorio=on&lab_nombre=..&lab_costo=..]
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::{ErrorCode, StaffSession, VisitSubmission};
use crate::inbound::http::error::status_for;
use crate::inbound::http::pages::{html, visit_form};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, notices, see_other};

/// Raw form body. Every field is optional on the wire; validation happens in
/// the domain.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VisitForm {
    /// Patient name.
    #[serde(rename = "paciente_nombre")]
    pub patient_name: String,
    /// Patient RUT.
    #[serde(rename = "paciente_rut")]
    pub patient_rut: String,
    /// Visit date, `YYYY-MM-DD`.
    #[serde(rename = "fecha_atencion")]
    pub visit_date: String,
    /// Treatment name.
    #[serde(rename = "tratamiento_nombre")]
    pub treatment_name: String,
    /// Treatment cost as typed.
    #[serde(rename = "tratamiento_costo")]
    pub treatment_cost: String,
    /// Checkbox; present (any value) when ticked.
    #[serde(rename = "hubo_laboratorio")]
    pub lab_requested: Option<String>,
    /// Lab name.
    #[serde(rename = "lab_nombre")]
    pub lab_name: Option<String>,
    /// Lab cost as typed.
    #[serde(rename = "lab_costo")]
    pub lab_cost: Option<String>,
}

impl From<VisitForm> for VisitSubmission {
    fn from(form: VisitForm) -> Self {
        Self {
            patient_name: form.patient_name,
            patient_rut: form.patient_rut,
            visit_date: form.visit_date,
            treatment_name: form.treatment_name,
            treatment_cost: form.treatment_cost,
            lab_requested: form.lab_requested.is_some(),
            lab_name: form.lab_name,
            lab_cost: form.lab_cost,
        }
    }
}

/// The doctor session, or the redirect to send instead.
fn require_doctor(session: &SessionContext) -> ApiResult<Result<StaffSession, HttpResponse>> {
    match session.staff()? {
        Some(staff) if staff.is_doctor() => Ok(Ok(staff)),
        _ => {
            session.flash(notices::UNAUTHORISED_ACCESS)?;
            Ok(Err(see_other("/login")))
        }
    }
}

/// Render the empty visit form.
#[get("/crear_atencion")]
pub async fn new_visit(session: SessionContext) -> ApiResult<HttpResponse> {
    if let Err(redirect) = require_doctor(&session)? {
        return Ok(redirect);
    }
    let notice = session.take_flash();
    Ok(html(StatusCode::OK, visit_form(notice.as_deref())))
}

/// Record a visit. Success returns to the panel; any failure re-renders an
/// empty form with the error notice.
#[post("/crear_atencion")]
pub async fn create_visit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<VisitForm>,
) -> ApiResult<HttpResponse> {
    let staff = match require_doctor(&session)? {
        Ok(staff) => staff,
        Err(redirect) => return Ok(redirect),
    };

    match state.visits.record_visit(&staff, form.into_inner().into()).await {
        Ok(_) => {
            session.flash(notices::VISIT_SAVED)?;
            Ok(see_other("/panel"))
        }
        Err(err) => {
            let message = if err.code() == ErrorCode::InternalError {
                notices::UNEXPECTED_ERROR
            } else {
                err.message()
            };
            let notice = notices::visit_failed(message);
            Ok(html(status_for(err.code()), visit_form(Some(&notice))))
        }
    }
}
