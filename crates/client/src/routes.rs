//! Route-level session guard.
//!
//! The route table itself lives with the views; this module only supplies
//! the decision logic it consumes: a requires-auth predicate check against
//! the current session, with the original destination preserved across the
//! login round trip.

use crate::session::SessionManager;

/// The login route.
pub const LOGIN_ROUTE: &str = "/login";

/// The home route, the fallback destination after login.
pub const HOME_ROUTE: &str = "/home";

/// Outcome of guarding a navigation against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The route is reachable as requested.
    Proceed,
    /// A protected route without a session: go to login, keeping the
    /// original target.
    RedirectToLogin {
        /// Full login route including the `redirect` parameter.
        to: String,
    },
    /// The login route was requested while already authenticated.
    RedirectHome,
}

/// Guard a navigation. The route table supplies `requires_auth`.
#[must_use]
pub fn decide(path: &str, requires_auth: bool, session: &SessionManager) -> RouteDecision {
    if path.starts_with(LOGIN_ROUTE) {
        return if session.is_authenticated() {
            RouteDecision::RedirectHome
        } else {
            RouteDecision::Proceed
        };
    }

    if requires_auth && !session.is_authenticated() {
        return RouteDecision::RedirectToLogin {
            to: login_redirect(path),
        };
    }

    RouteDecision::Proceed
}

/// Build the login route carrying the post-login return target.
#[must_use]
pub fn login_redirect(original: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", original)
        .finish();
    format!("{LOGIN_ROUTE}?{query}")
}

/// Resolve where to go after a successful login: the preserved `redirect`
/// target, or home when none was carried.
#[must_use]
pub fn post_login_target(redirect: Option<&str>) -> String {
    redirect
        .filter(|target| !target.is_empty())
        .map_or_else(|| HOME_ROUTE.to_string(), String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::models::UserInfo;
    use crate::session::NoopNavigator;
    use crate::storage::{MemoryBackend, Storage};

    fn session_manager() -> SessionManager {
        let storage = Storage::new(Arc::new(MemoryBackend::new()));
        SessionManager::new(storage, Arc::new(NoopNavigator))
    }

    fn authenticated_manager() -> SessionManager {
        let manager = session_manager();
        manager.apply_login(
            "tok",
            &UserInfo {
                id: "u-1".into(),
                username: None,
                nickname: None,
                avatar: None,
            },
        );
        manager
    }

    #[test]
    fn test_protected_route_without_session_redirects_to_login() {
        let decision = decide("/orders", true, &session_manager());
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                to: "/login?redirect=%2Forders".to_string()
            }
        );
    }

    #[test]
    fn test_protected_route_with_session_proceeds() {
        let decision = decide("/orders", true, &authenticated_manager());
        assert_eq!(decision, RouteDecision::Proceed);
    }

    #[test]
    fn test_public_route_without_session_proceeds() {
        let decision = decide("/home", false, &session_manager());
        assert_eq!(decision, RouteDecision::Proceed);
    }

    #[test]
    fn test_login_route_while_authenticated_goes_home() {
        let decision = decide("/login", false, &authenticated_manager());
        assert_eq!(decision, RouteDecision::RedirectHome);
    }

    #[test]
    fn test_login_route_while_unauthenticated_proceeds() {
        let decision = decide("/login", false, &session_manager());
        assert_eq!(decision, RouteDecision::Proceed);
    }

    #[test]
    fn test_post_login_target() {
        assert_eq!(post_login_target(Some("/orders")), "/orders");
        assert_eq!(post_login_target(Some("")), HOME_ROUTE);
        assert_eq!(post_login_target(None), HOME_ROUTE);
    }
}
