//! Entry point and role-based dashboard.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get};
use tracing::warn;

use crate::domain::{DashboardRoute, resolve_dashboard};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages::{admin_dashboard, doctor_dashboard, html};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::{notices, see_other};

/// `GET /`: send signed-in staff to the panel, everyone else to login.
#[get("/")]
pub async fn index(session: SessionContext) -> ApiResult<HttpResponse> {
    let target = if session.staff()?.is_some() {
        "/panel"
    } else {
        "/login"
    };
    Ok(see_other(target))
}

/// `GET /panel`: the dashboard for the session's role.
#[get("/panel")]
pub async fn panel(session: SessionContext) -> ApiResult<HttpResponse> {
    let staff = session.staff()?;
    match resolve_dashboard(staff.as_ref()) {
        DashboardRoute::Login => {
            session.flash(notices::LOGIN_REQUIRED)?;
            Ok(see_other("/login"))
        }
        DashboardRoute::Doctor { display_name } => {
            let notice = session.take_flash();
            Ok(html(
                StatusCode::OK,
                doctor_dashboard(&display_name, notice.as_deref()),
            ))
        }
        DashboardRoute::Admin => Ok(html(StatusCode::OK, admin_dashboard())),
        DashboardRoute::UnrecognisedRole => {
            if let Some(staff) = &staff {
                warn!(user_id = %staff.user_id, role = %staff.role, "clearing session with unrecognised role");
            }
            session.clear();
            session.flash(notices::UNRECOGNISED_ROLE)?;
            Ok(see_other("/login"))
        }
    }
}
