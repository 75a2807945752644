// Access gate: render-or-redirect decisions per requested view
//
// Guards are pure functions of (identity, requested path). They never
// touch the session store directly, so the same inputs always produce the
// same decision.

pub mod routes;

pub use routes::{RouteAccess, RouteTable};

use crate::models::{Identity, RoutePaths};
use serde::Serialize;

/// Redirect instruction for the navigation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Target path
    pub to: String,
    /// Where to send the user after signing in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,
    /// Replace the current history entry instead of pushing
    pub replace: bool,
}

impl Redirect {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            to: path.into(),
            return_to: None,
            replace: true,
        }
    }

    pub fn with_return_to(mut self, path: impl Into<String>) -> Self {
        self.return_to = Some(path.into());
        self
    }
}

/// Outcome of evaluating a guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Render,
    Redirect(Redirect),
}

impl Decision {
    pub fn redirect(path: impl Into<String>) -> Self {
        Decision::Redirect(Redirect::to(path))
    }

    pub fn is_render(&self) -> bool {
        matches!(self, Decision::Render)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Redirect(redirect) => Some(redirect.to.as_str()),
            Decision::Render => None,
        }
    }
}

/// A route guard
pub trait Guard {
    fn check(&self, identity: Option<&Identity>, path: &str) -> Decision;

    /// Run `next` only if `self` renders
    fn then<G: Guard>(self, next: G) -> Then<Self, G>
    where
        Self: Sized,
    {
        Then {
            first: self,
            second: next,
        }
    }
}

impl<F> Guard for F
where
    F: Fn(Option<&Identity>, &str) -> Decision,
{
    fn check(&self, identity: Option<&Identity>, path: &str) -> Decision {
        self(identity, path)
    }
}

/// Two guards in sequence; the first redirect wins
#[derive(Debug, Clone)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

impl<A: Guard, B: Guard> Guard for Then<A, B> {
    fn check(&self, identity: Option<&Identity>, path: &str) -> Decision {
        match self.first.check(identity, path) {
            Decision::Render => self.second.check(identity, path),
            redirect => redirect,
        }
    }
}

/// Evaluate guards in order; the first redirect wins
pub fn all(guards: &[&dyn Guard], identity: Option<&Identity>, path: &str) -> Decision {
    guards
        .iter()
        .map(|guard| guard.check(identity, path))
        .find(|decision| !decision.is_render())
        .unwrap_or(Decision::Render)
}

/// Signed-in users only
#[derive(Debug, Clone)]
pub struct RequireAuth {
    paths: RoutePaths,
}

impl RequireAuth {
    pub fn new(paths: RoutePaths) -> Self {
        Self { paths }
    }

    // The landing and login pages are never offered as a return target
    pub(crate) fn return_target<'a>(&'a self, path: &'a str) -> &'a str {
        if path.is_empty() {
            return &self.paths.dashboard;
        }

        let path = routes::normalize(path);
        if path == routes::normalize(&self.paths.landing)
            || path == routes::normalize(&self.paths.login)
        {
            &self.paths.dashboard
        } else {
            path
        }
    }
}

impl Guard for RequireAuth {
    fn check(&self, identity: Option<&Identity>, path: &str) -> Decision {
        if identity.is_some() {
            return Decision::Render;
        }

        Decision::Redirect(
            Redirect::to(self.paths.landing.as_str()).with_return_to(self.return_target(path)),
        )
    }
}

/// Doctors only; patients land on their own dashboard
#[derive(Debug, Clone)]
pub struct RequireDoctor {
    paths: RoutePaths,
}

impl RequireDoctor {
    pub fn new(paths: RoutePaths) -> Self {
        Self { paths }
    }
}

impl Guard for RequireDoctor {
    fn check(&self, identity: Option<&Identity>, _path: &str) -> Decision {
        match identity {
            None => Decision::redirect(self.paths.login.as_str()),
            Some(identity) if !identity.is_doctor() => {
                Decision::redirect(self.paths.dashboard.as_str())
            }
            Some(_) => Decision::Render,
        }
    }
}

/// Patients only; doctors land on the doctor dashboard
#[derive(Debug, Clone)]
pub struct RequirePatient {
    paths: RoutePaths,
}

impl RequirePatient {
    pub fn new(paths: RoutePaths) -> Self {
        Self { paths }
    }
}

impl Guard for RequirePatient {
    fn check(&self, identity: Option<&Identity>, _path: &str) -> Decision {
        match identity {
            None => Decision::redirect(self.paths.landing.as_str()),
            Some(identity) if identity.is_doctor() => {
                Decision::redirect(self.paths.doctor_dashboard.as_str())
            }
            Some(_) => Decision::Render,
        }
    }
}
