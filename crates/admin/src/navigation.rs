//! Navigation capability used by the session guard.
//!
//! The guard needs two things from its host: where the operator currently is
//! (auth failures on the sign-in screen must not trigger another logout) and a
//! way to send them back to sign-in. Hosts implement [`Navigator`].

use std::sync::{Mutex, PoisonError};

/// Route constants for the dashboard.
pub mod routes {
    pub const SIGN_IN: &str = "/signin";
    pub const SIGN_UP: &str = "/signup";
    pub const FORGOT_PASSWORD: &str = "/forgot-password";
    pub const RESET_PASSWORD: &str = "/reset-password";
    pub const VERIFY_OTP: &str = "/verify-otp";
    pub const DASHBOARD: &str = "/dashboard";

    /// Routes where the operator is, by definition, not signed in.
    pub const AUTH_ROUTES: [&str; 5] = [
        SIGN_IN,
        SIGN_UP,
        FORGOT_PASSWORD,
        RESET_PASSWORD,
        VERIFY_OTP,
    ];
}

/// Whether `route` is one of the authentication pages (query string and
/// sub-paths included).
#[must_use]
pub fn is_auth_route(route: &str) -> bool {
    let path = route.split(['?', '#']).next().unwrap_or(route);
    let path = path.trim_end_matches('/');
    routes::AUTH_ROUTES.iter().any(|auth| {
        path == *auth
            || path
                .strip_prefix(auth)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Host navigation: current location and hard redirects.
pub trait Navigator: Send + Sync {
    /// Path of the current location, e.g. `/orders/pending`.
    fn current_route(&self) -> String;

    /// Leave the current location for `route`, discarding in-page state.
    fn redirect(&self, route: &str);
}

/// Navigator that tracks location in memory and records every redirect.
#[derive(Debug)]
pub struct MemoryNavigator {
    current: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial_route: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(initial_route.into()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Move to `route` without recording a redirect (normal in-app navigation).
    pub fn navigate(&self, route: impl Into<String>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = route.into();
    }

    /// Every redirect issued so far, oldest first.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new(routes::DASHBOARD)
    }
}

impl Navigator for MemoryNavigator {
    fn current_route(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn redirect(&self, route: &str) {
        tracing::debug!(route, "redirecting");
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_owned());
        self.navigate(route);
    }
}
