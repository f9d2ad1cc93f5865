//! Route table and the authentication guard in front of it

/// Console routes; `/` is the login page, everything else is private
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    SmsSender,
    Logs,
}

impl Route {
    pub const PRIVATE: [Route; 3] = [Route::Dashboard, Route::SmsSender, Route::Logs];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Dashboard => "/dashboard",
            Route::SmsSender => "/sms-sender",
            Route::Logs => "/logs",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Dashboard => "Dashboard",
            Route::SmsSender => "SMS Sender",
            Route::Logs => "Logs",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Login),
            "/dashboard" => Some(Route::Dashboard),
            "/sms-sender" => Some(Route::SmsSender),
            "/logs" => Some(Route::Logs),
            _ => None,
        }
    }
}

/// Outcome of running the guard for a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow(Route),
    Redirect {
        to: Route,
        /// Intended destination, remembered so login can return to it
        redirect: Option<String>,
    },
}

impl RouteDecision {
    /// Route that ends up on screen
    pub fn destination(&self) -> Route {
        match self {
            RouteDecision::Allow(route) => *route,
            RouteDecision::Redirect { to, .. } => *to,
        }
    }
}

/// Signed-in users never see the login page; everyone else only sees it
pub fn authorize(target: Route, is_authenticated: bool) -> RouteDecision {
    match (target, is_authenticated) {
        (Route::Login, true) => RouteDecision::Redirect {
            to: Route::Dashboard,
            redirect: None,
        },
        (Route::Login, false) => RouteDecision::Allow(Route::Login),
        (route, true) => RouteDecision::Allow(route),
        (route, false) => RouteDecision::Redirect {
            to: Route::Login,
            redirect: Some(route.path().to_string()),
        },
    }
}

/// Where to go after a successful login
pub fn post_login_destination(redirect: Option<&str>) -> Route {
    redirect
        .and_then(Route::from_path)
        .filter(|route| *route != Route::Login)
        .unwrap_or(Route::Dashboard)
}
