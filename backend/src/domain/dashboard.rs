//! Role-based dashboard dispatch.

use super::{FALLBACK_DOCTOR_NAME, Role, StaffSession};

/// Where a dashboard request should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardRoute {
    /// No session: send the visitor to the login page.
    Login,
    /// Doctor dashboard greeting the given name.
    Doctor {
        /// Name shown in the greeting.
        display_name: String,
    },
    /// Admin placeholder page.
    Admin,
    /// The session carries a role we do not serve. The caller must clear the
    /// whole session before redirecting to login.
    UnrecognisedRole,
}

/// Pick the dashboard for `session`.
///
/// # Examples
/// ```
/// use clinica::domain::{DashboardRoute, StaffSession, UserId, resolve_dashboard};
///
/// let session = StaffSession {
///     user_id: UserId::new(1),
///     role: "root".into(),
///     display_name: None,
/// };
/// assert_eq!(resolve_dashboard(Some(&session)), DashboardRoute::UnrecognisedRole);
/// assert_eq!(resolve_dashboard(None), DashboardRoute::Login);
/// ```
pub fn resolve_dashboard(session: Option<&StaffSession>) -> DashboardRoute {
    let Some(session) = session else {
        return DashboardRoute::Login;
    };
    match session.role() {
        Some(Role::Doctor) => DashboardRoute::Doctor {
            display_name: session
                .display_name
                .clone()
                .unwrap_or_else(|| FALLBACK_DOCTOR_NAME.to_owned()),
        },
        Some(Role::Admin) => DashboardRoute::Admin,
        None => DashboardRoute::UnrecognisedRole,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::UserId;
    use rstest::rstest;

    fn session(role: &str, display_name: Option<&str>) -> StaffSession {
        StaffSession {
            user_id: UserId::new(3),
            role: role.to_owned(),
            display_name: display_name.map(str::to_owned),
        }
    }

    #[rstest]
    #[case(session("doctor", Some("Ana")), DashboardRoute::Doctor { display_name: "Ana".to_owned() })]
    #[case(session("doctor", None), DashboardRoute::Doctor { display_name: "Doctor".to_owned() })]
    #[case(session("admin", None), DashboardRoute::Admin)]
    #[case(session("", None), DashboardRoute::UnrecognisedRole)]
    #[case(session("DOCTOR", Some("Ana")), DashboardRoute::UnrecognisedRole)]
    fn routes_by_role(#[case] session: StaffSession, #[case] expected: DashboardRoute) {
        assert_eq!(resolve_dashboard(Some(&session)), expected);
    }
}
