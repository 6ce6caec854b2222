use std::fmt;

use crate::session::SessionContext;

/// Screens of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Resume,
    Jobs,
    Applications,
    ApplicationDetail(String),
}

impl Route {
    /// Screens that need a session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Resume => "/resume".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::Applications => "/applications".to_string(),
            Route::ApplicationDetail(id) => format!("/applications/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Resolves where a navigation to `requested` actually lands.
/// Protected screens redirect to login without a session; the auth screens
/// redirect to the dashboard when one already exists.
pub fn guard(requested: Route, session: &SessionContext) -> Route {
    match (requested.is_protected(), session.is_authenticated()) {
        (true, false) => Route::Login,
        (false, true) => Route::Dashboard,
        _ => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{anonymous, session};

    #[test]
    fn test_protected_routes_redirect_to_login() {
        let ctx = anonymous();
        for route in [
            Route::Dashboard,
            Route::Resume,
            Route::Jobs,
            Route::Applications,
            Route::ApplicationDetail("a1".to_string()),
        ] {
            assert_eq!(guard(route, &ctx), Route::Login);
        }
        assert_eq!(guard(Route::Register, &ctx), Route::Register);
    }

    #[test]
    fn test_authenticated_user_passes_through() {
        let ctx = session();
        assert_eq!(
            guard(Route::ApplicationDetail("a1".to_string()), &ctx),
            Route::ApplicationDetail("a1".to_string())
        );
        assert_eq!(guard(Route::Login, &ctx), Route::Dashboard);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::ApplicationDetail("7".to_string()).to_string(), "/applications/7");
        assert_eq!(Route::Jobs.path(), "/jobs");
    }
}
