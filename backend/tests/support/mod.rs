//! Shared harness: the full page router over the in-memory clinic.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test as actix_test, web};
use clinica::Trace;
use clinica::domain::{StaffLoginService, VisitRecorderService};
use clinica::inbound::http::configure;
use clinica::inbound::http::session::{SESSION_COOKIE_NAME, session_middleware};
use clinica::inbound::http::state::HttpState;
use clinica::test_support::InMemoryClinic;

pub async fn clinic_app(
    clinic: &InMemoryClinic,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = HttpState::new(
        Arc::new(StaffLoginService::new(Arc::new(clinic.clone()))),
        Arc::new(VisitRecorderService::new(Arc::new(clinic.clone()))),
    );
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .wrap(session_middleware(Key::generate(), false))
            .configure(configure),
    )
    .await
}

/// Browser-like client that follows the session cookie across requests.
pub struct Browser {
    cookie: Option<Cookie<'static>>,
}

pub struct Page {
    pub status: actix_web::http::StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Browser {
    pub fn new() -> Self {
        Self { cookie: None }
    }

    pub async fn get(
        &mut self,
        app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
        uri: &str,
    ) -> Page {
        let req = actix_test::TestRequest::get().uri(uri);
        self.send(app, req).await
    }

    pub async fn post_form(
        &mut self,
        app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
        uri: &str,
        form: &[(&str, &str)],
    ) -> Page {
        let req = actix_test::TestRequest::post().uri(uri).set_form(form);
        self.send(app, req).await
    }

    async fn send(
        &mut self,
        app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
        mut req: actix_test::TestRequest,
    ) -> Page {
        if let Some(cookie) = self.cookie.clone() {
            req = req.cookie(cookie);
        }
        let res = actix_test::call_service(app, req.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        {
            self.cookie = Some(cookie.into_owned());
        }
        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = actix_test::read_body(res).await;
        Page {
            status,
            location,
            body: String::from_utf8(body.to_vec()).expect("utf8 body"),
        }
    }

    pub async fn log_in(
        &mut self,
        app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
        email: &str,
        password: &str,
    ) -> Page {
        self.post_form(app, "/login", &[("email", email), ("password", password)])
            .await
    }
}
