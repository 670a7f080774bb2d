//! crates/coursebook_core/src/navigation.rs
//!
//! Where a consumer surface sends the user next. These rules only read the
//! session; they never change it.

use crate::domain::User;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Signin,
    Signup,
    Questionnaire,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Signin => "/signin",
            Route::Signup => "/signup",
            Route::Questionnaire => "/questionnaire",
            Route::Dashboard => "/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub const ROUTE_AFTER_SIGNOUT: Route = Route::Home;

/// After a successful signup or signin.
pub fn route_after_auth(user: &User) -> Route {
    if user.has_completed_questionnaire {
        Route::Dashboard
    } else {
        Route::Questionnaire
    }
}

/// Where the dashboard sends a visitor it cannot serve, if anywhere.
pub fn dashboard_redirect(user: Option<&User>) -> Option<Route> {
    match user {
        None => Some(Route::Signin),
        Some(user) if !user.has_completed_questionnaire => Some(Route::Questionnaire),
        Some(_) => None,
    }
}

/// The questionnaire is one-time: completed users go straight to the dashboard.
pub fn questionnaire_redirect(user: Option<&User>) -> Option<Route> {
    match user {
        Some(user) if user.has_completed_questionnaire => Some(Route::Dashboard),
        _ => None,
    }
}
