//! Driving port for the login use-case.
//!
//! HTTP handlers depend on this trait rather than on the directory adapter,
//! so handler tests can swap in a mock.

use async_trait::async_trait;

use crate::domain::{AuthenticatedStaff, Error, LoginCredentials};

/// Message returned for every rejected login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and describe the authenticated staff member.
    ///
    /// Unknown emails and wrong passwords both yield
    /// [`ErrorCode::Unauthorized`](crate::domain::ErrorCode::Unauthorized)
    /// carrying [`INVALID_CREDENTIALS`].
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedStaff, Error>;
}
