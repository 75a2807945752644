// Portal route map: which guards wrap which view

use super::{Decision, Guard, RequireAuth, RequireDoctor, RequirePatient, all};
use crate::models::{Identity, RoutePaths};
use serde::Serialize;
use std::collections::HashMap;

/// Guard combination applied to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAccess {
    /// Anyone
    Public,
    /// Any signed-in user, doctors included
    Authenticated,
    /// Signed-in patients; doctors are sent to their dashboard
    AuthenticatedPatient,
    /// Doctors only
    Doctor,
}

/// Views offered by the portal, keyed by path
pub struct RouteTable {
    routes: HashMap<String, RouteAccess>,
    require_auth: RequireAuth,
    require_patient: RequirePatient,
    require_doctor: RequireDoctor,
}

impl RouteTable {
    /// Empty table using `paths` as redirect destinations
    pub fn new(paths: RoutePaths) -> Self {
        Self {
            routes: HashMap::new(),
            require_auth: RequireAuth::new(paths.clone()),
            require_patient: RequirePatient::new(paths.clone()),
            require_doctor: RequireDoctor::new(paths),
        }
    }

    /// The Nexora portal's routes
    pub fn portal(paths: RoutePaths) -> Self {
        let mut table = Self::new(paths.clone());

        table.add(&paths.landing, RouteAccess::Public);
        table.add(&paths.login, RouteAccess::Public);
        table.add("/register", RouteAccess::Public);

        for path in [
            "/medications",
            "/telemedicine",
            "/devices",
            "/predictions",
            "/emergency",
            "/appointments",
            "/health-records",
            "/community",
            "/diet-exercise",
            "/analytics",
        ] {
            table.add(path, RouteAccess::Authenticated);
        }

        table.add("/symptom-checker", RouteAccess::AuthenticatedPatient);
        table.add(&paths.dashboard, RouteAccess::AuthenticatedPatient);
        table.add(&paths.doctor_dashboard, RouteAccess::Doctor);

        table
    }

    pub fn add(&mut self, path: &str, access: RouteAccess) -> &mut Self {
        self.routes.insert(normalize(path).to_string(), access);
        self
    }

    pub fn access_for(&self, path: &str) -> Option<RouteAccess> {
        self.routes.get(normalize(path)).copied()
    }

    /// Decide for `path`; `None` when the portal has no such view
    pub fn resolve(&self, identity: Option<&Identity>, path: &str) -> Option<Decision> {
        let path = normalize(path);

        let decision = match self.access_for(path)? {
            RouteAccess::Public => Decision::Render,
            RouteAccess::Authenticated => self.require_auth.check(identity, path),
            RouteAccess::AuthenticatedPatient => all(
                &[&self.require_auth as &dyn Guard, &self.require_patient],
                identity,
                path,
            ),
            RouteAccess::Doctor => self.require_doctor.check(identity, path),
        };

        Some(decision)
    }
}

// "/devices/" and "/devices" are the same view
pub(crate) fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
