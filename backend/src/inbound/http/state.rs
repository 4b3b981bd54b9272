//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, VisitRecorder};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential check.
    pub login: Arc<dyn LoginService>,
    /// Visit write path.
    pub visits: Arc<dyn VisitRecorder>,
}

impl HttpState {
    /// Bundle the driving ports.
    #[must_use]
    pub fn new(login: Arc<dyn LoginService>, visits: Arc<dyn VisitRecorder>) -> Self {
        Self { login, visits }
    }
}
