//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries `id_usuario`, `rol_usuario`, the optional
//! `nombre_doctor` greeting and a one-shot `aviso` notice.

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthenticatedStaff, Error, StaffSession, UserId};

pub(crate) const USER_ID_KEY: &str = "id_usuario";
pub(crate) const ROLE_KEY: &str = "rol_usuario";
pub(crate) const DISPLAY_NAME_KEY: &str = "nombre_doctor";
pub(crate) const NOTICE_KEY: &str = "aviso";

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Build the cookie session middleware.
///
/// The cookie is encrypted (`Private`), `HttpOnly`, `SameSite=Lax` and lives
/// for two hours.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

/// Newtype wrapper that exposes staff-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

fn read_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

fn write_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store a freshly authenticated identity, replacing anything present.
    pub fn establish(&self, staff: &AuthenticatedStaff) -> Result<(), Error> {
        self.0.clear();
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, staff.user_id.get())
            .map_err(write_failed)?;
        self.0
            .insert(ROLE_KEY, staff.role.as_str())
            .map_err(write_failed)?;
        if let Some(name) = &staff.display_name {
            self.0
                .insert(DISPLAY_NAME_KEY, name.as_str())
                .map_err(write_failed)?;
        }
        Ok(())
    }

    /// Snapshot of the logged-in staff member, if any.
    ///
    /// A user id stored without a readable role comes back with an empty
    /// role, which no dashboard accepts.
    pub fn staff(&self) -> Result<Option<StaffSession>, Error> {
        let Some(user_id) = self.0.get::<i32>(USER_ID_KEY).map_err(read_failed)? else {
            return Ok(None);
        };
        let role = match self.0.get::<String>(ROLE_KEY) {
            Ok(Some(role)) => role,
            Ok(None) | Err(_) => {
                warn!(user_id, "session has a user id but no readable role");
                String::new()
            }
        };
        let display_name = self
            .0
            .get::<String>(DISPLAY_NAME_KEY)
            .map_err(read_failed)?;
        Ok(Some(StaffSession {
            user_id: UserId::new(user_id),
            role,
            display_name,
        }))
    }

    /// Drop every key, including pending notices.
    pub fn clear(&self) {
        self.0.clear();
    }

    /// Queue a notice for the next rendered page.
    pub fn flash(&self, notice: &str) -> Result<(), Error> {
        self.0.insert(NOTICE_KEY, notice).map_err(write_failed)
    }

    /// Take the pending notice, if any.
    pub fn take_flash(&self) -> Option<String> {
        match self.0.remove_as::<String>(NOTICE_KEY)? {
            Ok(notice) => Some(notice),
            Err(raw) => {
                warn!(raw_len = raw.len(), "discarding malformed session notice");
                None
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
