//! Session bookkeeping on top of the local store

use chrono::Utc;
use tracing::{info, warn};

use super::backend::AuthBackend;
use super::errors::AuthError;
use crate::models::{AuthUser, LoginCredentials, LoginResponse};
use crate::storage::LocalStorage;

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const AUTH_USER_KEY: &str = "auth_user";

/// Stored session: a bearer token and the signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    storage: LocalStorage,
}

impl AuthService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self
            .storage
            .get_item(AUTH_TOKEN_KEY)
            .await?
            .map_or(false, |token| !token.is_empty()))
    }

    /// Stored user record; a malformed record reads as no user
    pub async fn get_user(&self) -> Result<Option<AuthUser>, AuthError> {
        let Some(raw) = self.storage.get_item(AUTH_USER_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Ignoring malformed stored user record: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn get_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.storage.get_item(AUTH_TOKEN_KEY).await?)
    }

    pub async fn session(&self) -> Result<Option<AuthSession>, AuthError> {
        match self.get_token().await? {
            Some(token) if !token.is_empty() => Ok(Some(AuthSession {
                token,
                user: self.get_user().await?,
            })),
            _ => Ok(None),
        }
    }

    pub async fn set_auth(&self, token: &str, user: &AuthUser) -> Result<(), AuthError> {
        self.storage.set_item(AUTH_TOKEN_KEY, token).await?;
        self.storage.set_json(AUTH_USER_KEY, user).await?;
        Ok(())
    }

    pub async fn clear_auth(&self) -> Result<(), AuthError> {
        self.storage.remove_item(AUTH_TOKEN_KEY).await?;
        self.storage.remove_item(AUTH_USER_KEY).await?;
        info!("Cleared stored session");
        Ok(())
    }

    /// Log in through `backend`; a successful reply with a user starts a session
    pub async fn login(
        &self,
        backend: &dyn AuthBackend,
        credentials: &LoginCredentials,
    ) -> Result<LoginResponse, AuthError> {
        let response = backend.login(credentials).await?;
        self.store_login(&response).await?;
        Ok(response)
    }

    /// Persist the session carried by a login reply, if any
    pub async fn store_login(&self, response: &LoginResponse) -> Result<Option<AuthSession>, AuthError> {
        match (response.success, &response.user) {
            (true, Some(user)) => {
                let token = generate_token();
                self.set_auth(&token, user).await?;
                info!("Started session for {}", user.email);
                Ok(Some(AuthSession {
                    token,
                    user: Some(user.clone()),
                }))
            }
            _ => Ok(None),
        }
    }
}

/// Opaque client-side token: `token_<unix millis>_<9 random chars>`
pub fn generate_token() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("token_{}_{}", Utc::now().timestamp_millis(), &random[..9])
}
