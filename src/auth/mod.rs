//! Authentication: the hardcoded login check, stored sessions, and the route guard

pub mod backend;
pub mod errors;
pub mod guard;
pub mod service;

pub use backend::{AuthBackend, LocalAuthBackend, RemoteAuthBackend};
pub use errors::AuthError;
pub use guard::{authorize, post_login_destination, Route, RouteDecision};
pub use service::{AuthService, AuthSession};

use std::sync::Arc;

use crate::config::Config;

/// Pick the login backend the configuration asks for
pub fn backend_from_config(config: &Config) -> anyhow::Result<Arc<dyn AuthBackend>> {
    Ok(match &config.auth_url {
        Some(url) => Arc::new(RemoteAuthBackend::new(config.http_client()?, url.clone())),
        None => Arc::new(LocalAuthBackend),
    })
}
