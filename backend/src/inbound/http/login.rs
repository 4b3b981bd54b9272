//! Login and logout handlers.
//!
//! ```text
//! GET  /login
//! POST /login   email=..&password=..
//! GET  /logout
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{ErrorCode, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages::{html, login_page};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{notices, see_other};

/// Login form body. Missing fields deserialize as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Submitted email, matched exactly.
    pub email: String,
    /// Submitted password.
    pub password: String,
}

/// Render the login form with any pending notice.
#[get("/login")]
pub async fn login_form(session: SessionContext) -> HttpResponse {
    let notice = session.take_flash();
    html(StatusCode::OK, login_page(notice.as_deref()))
}

/// Authenticate and start a session.
///
/// Blank fields, unknown emails and wrong passwords all re-render the form
/// with the same notice.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let LoginForm { email, password } = form.into_inner();
    let Ok(credentials) = LoginCredentials::try_from_parts(&email, &password) else {
        return Ok(rejected());
    };

    match state.login.authenticate(&credentials).await {
        Ok(staff) => {
            session.establish(&staff)?;
            info!(user_id = %staff.user_id, role = %staff.role, "session established");
            Ok(see_other("/panel"))
        }
        Err(err) if err.code() == ErrorCode::Unauthorized => Ok(rejected()),
        Err(err) if err.code() == ErrorCode::ServiceUnavailable => {
            warn!(error = err.message(), "login unavailable: database unreachable");
            Ok(html(
                StatusCode::SERVICE_UNAVAILABLE,
                login_page(Some(notices::SERVICE_UNAVAILABLE)),
            ))
        }
        Err(err) => {
            warn!(code = %err.code(), error = err.message(), "login failed unexpectedly");
            Ok(html(
                StatusCode::INTERNAL_SERVER_ERROR,
                login_page(Some(notices::UNEXPECTED_ERROR)),
            ))
        }
    }
}

fn rejected() -> HttpResponse {
    html(StatusCode::OK, login_page(Some(notices::INVALID_CREDENTIALS)))
}

/// End the session and return to the login form.
#[get("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    session.flash(notices::LOGGED_OUT)?;
    Ok(see_other("/login"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;

    use crate::domain::Error;
    use crate::domain::ports::{INVALID_CREDENTIALS, MockLoginService, MockVisitRecorder};
    use crate::inbound::http::notices;
    use crate::inbound::http::test_utils::{
        doctor, init_app, location, login_as, login_cookie, session_cookie, state_with,
        strict_state,
    };
    use actix_web::test as actix_test;
    use rstest::rstest;

    fn login_failing_with(err: Error) -> MockLoginService {
        let mut login = MockLoginService::new();
        login.expect_authenticate().return_once(move |_| Err(err));
        login
    }

    async fn post_login(
        login: MockLoginService,
        email: &str,
        password: &str,
    ) -> (StatusCode, String) {
        let app = init_app(state_with(login, MockVisitRecorder::new())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_form(&[("email", email), ("password", password)])
                .to_request(),
        )
        .await;
        let status = res.status();
        let body = actix_test::read_body(res).await;
        (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    #[actix_web::test]
    async fn successful_login_redirects_to_the_panel() {
        let app = init_app(state_with(login_as(doctor()), MockVisitRecorder::new())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_form(&[("email", "ana@clinica.cl"), ("password", "pw")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/panel"));
        let cookie = session_cookie(&res).expect("session cookie");
        assert!(cookie.http_only().unwrap_or(false));
    }

    #[actix_web::test]
    async fn rejected_credentials_re_render_the_form() {
        let (status, body) = post_login(
            login_failing_with(Error::unauthorized(INVALID_CREDENTIALS)),
            "ana@clinica.cl",
            "wrong",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(notices::INVALID_CREDENTIALS));
    }

    #[rstest]
    #[case("", "pw")]
    #[case("ana@clinica.cl", "")]
    #[actix_web::test]
    async fn blank_fields_never_reach_the_login_port(#[case] email: &str, #[case] password: &str) {
        let (status, body) = post_login(MockLoginService::new(), email, password).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(notices::INVALID_CREDENTIALS));
    }

    #[actix_web::test]
    async fn missing_form_fields_are_treated_as_blank() {
        let app = init_app(strict_state()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_form(&[("email", "ana@clinica.cl")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn database_outage_shows_a_friendly_notice() {
        let (status, body) = post_login(
            login_failing_with(Error::service_unavailable("connection refused")),
            "ana@clinica.cl",
            "pw",
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains(notices::SERVICE_UNAVAILABLE));
        assert!(!body.contains("connection refused"));
    }

    #[actix_web::test]
    async fn logout_clears_the_session_and_says_goodbye() {
        let app = init_app(state_with(login_as(doctor()), MockVisitRecorder::new())).await;
        let cookie = login_cookie(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/logout").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(location(&res), Some("/login"));
        let cookie = session_cookie(&res).expect("logout rewrites the cookie");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/login").cookie(cookie.clone()).to_request(),
        )
        .await;
        let cookie = session_cookie(&res).unwrap_or(cookie);
        let body = actix_test::read_body(res).await;
        assert!(std::str::from_utf8(&body).expect("utf8").contains(notices::LOGGED_OUT));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/panel").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(location(&res), Some("/login"));
    }
}
