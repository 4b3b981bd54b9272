//! HTTP inbound adapter: server-rendered clinic pages.
//!
//! Handlers read the session through [`session::SessionContext`], call the
//! driving ports held in [`state::HttpState`] and answer with HTML or a
//! `303 See Other` redirect.

pub mod error;
pub mod health;
pub mod login;
pub mod notices;
pub mod pages;
pub mod panel;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod visits;

use actix_web::http::header;
use actix_web::{HttpResponse, web};

pub use error::ApiResult;

/// `303 See Other` to `location`, so a POST is followed by a GET.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Mount the clinic pages. The caller provides `web::Data<HttpState>` and
/// the session middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use clinica::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(panel::index)
        .service(panel::panel)
        .service(login::login_form)
        .service(login::login)
        .service(login::logout)
        .service(visits::new_visit)
        .service(visits::create_visit);
}
