//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};

use crate::domain::ports::{MockLoginService, MockVisitRecorder};
use crate::domain::{AuthenticatedStaff, UserId};
use crate::inbound::http::configure;
use crate::inbound::http::session::{SESSION_COOKIE_NAME, session_middleware};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware(Key::generate(), false)
}

/// State whose ports panic on any unexpected call.
pub fn strict_state() -> HttpState {
    state_with(MockLoginService::new(), MockVisitRecorder::new())
}

/// State backed by the given mocks.
pub fn state_with(login: MockLoginService, visits: MockVisitRecorder) -> HttpState {
    HttpState::new(Arc::new(login), Arc::new(visits))
}

/// The session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// The `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Service under test with every clinic route mounted.
pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .configure(configure),
    )
    .await
}

/// A signed-in doctor named Ana.
pub fn doctor() -> AuthenticatedStaff {
    AuthenticatedStaff {
        user_id: UserId::new(7),
        role: "doctor".to_owned(),
        display_name: Some("Ana".to_owned()),
    }
}

/// Login port that accepts one sign-in as `staff`.
pub fn login_as(staff: AuthenticatedStaff) -> MockLoginService {
    let mut login = MockLoginService::new();
    login
        .expect_authenticate()
        .times(1)
        .return_once(move |_| Ok(staff));
    login
}

/// Sign in through `POST /login` and return the resulting session cookie.
pub async fn login_cookie(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
) -> Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_form(&[("email", "ana@clinica.cl"), ("password", "pw")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "login should redirect");
    session_cookie(&res).expect("login sets the session cookie")
}
