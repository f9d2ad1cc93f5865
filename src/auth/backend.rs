//! Login endpoint: the in-process credential check and a remote variant

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::errors::AuthError;
use crate::models::{AuthUser, LoginCredentials, LoginResponse};

pub const ADMIN_EMAIL: &str = "admin@gmail.com";
pub const ADMIN_PASSWORD: &str = "12345";
pub const ADMIN_NAME: &str = "Admin User";

const AUTH_ENDPOINT: &str = "/api/auth";

/// Something that can answer a login request
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, AuthError>;
}

/// Handle a raw `POST /api/auth` body and produce the status and JSON reply
pub fn handle_auth_request(body: &str) -> (StatusCode, LoginResponse) {
    let parsed = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) if !value.is_null() => value,
        _ => {
            warn!("Rejected malformed auth request body");
            return (
                StatusCode::BAD_REQUEST,
                LoginResponse {
                    success: false,
                    message: "Invalid request format".to_string(),
                    user: None,
                },
            );
        }
    };

    let email = parsed.get("email").and_then(|v| v.as_str());
    let password = parsed.get("password").and_then(|v| v.as_str());

    if email == Some(ADMIN_EMAIL) && password == Some(ADMIN_PASSWORD) {
        (
            StatusCode::OK,
            LoginResponse {
                success: true,
                message: "Login successful".to_string(),
                user: Some(AuthUser {
                    email: ADMIN_EMAIL.to_string(),
                    name: ADMIN_NAME.to_string(),
                }),
            },
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            LoginResponse {
                success: false,
                message: "Invalid email or password".to_string(),
                user: None,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turn an endpoint reply into a login result; non-2xx replies become errors
pub fn interpret_response(status: StatusCode, body: &str) -> Result<LoginResponse, AuthError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Login failed".to_string());
        debug!("Auth endpoint answered {}: {}", status, message);
        return Err(AuthError::Rejected(message));
    }

    Ok(serde_json::from_str(body)?)
}

/// Answers logins in-process with the built-in credential check
#[derive(Debug, Default, Clone)]
pub struct LocalAuthBackend;

#[async_trait]
impl AuthBackend for LocalAuthBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, AuthError> {
        let body = serde_json::to_string(credentials)?;
        let (status, reply) = handle_auth_request(&body);
        info!("Local login for {} answered {}", credentials.email, status);
        interpret_response(status, &serde_json::to_string(&reply)?)
    }
}

/// Posts logins to `{base_url}/api/auth`
#[derive(Debug, Clone)]
pub struct RemoteAuthBackend {
    client: Client,
    base_url: String,
}

impl RemoteAuthBackend {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AuthBackend for RemoteAuthBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, AuthError> {
        let url = format!("{}{}", self.base_url, AUTH_ENDPOINT);
        debug!("Posting login to {}", url);

        let response = self.client.post(&url).json(credentials).send().await?;
        let status = response.status();
        let body = response.text().await?;

        info!("Remote login for {} answered {}", credentials.email, status);
        interpret_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_handler_accepts_admin() {
        let (status, reply) =
            handle_auth_request(r#"{"email":"admin@gmail.com","password":"12345"}"#);
        assert_eq!(status, StatusCode::OK);
        assert!(reply.success);
        assert_eq!(reply.message, "Login successful");
        assert_eq!(reply.user.unwrap().name, "Admin User");
    }

    #[test]
    fn test_handler_rejects_other_pairs() {
        for body in [
            r#"{"email":"admin@gmail.com","password":"123456"}"#,
            r#"{"email":"root@gmail.com","password":"12345"}"#,
            r#"{"email":"admin@gmail.com"}"#,
            r#"{}"#,
        ] {
            let (status, reply) = handle_auth_request(body);
            assert_eq!(status, StatusCode::UNAUTHORIZED, "body: {}", body);
            assert_eq!(reply.message, "Invalid email or password");
            assert!(reply.user.is_none());
        }
    }

    #[test]
    fn test_handler_rejects_malformed_body() {
        for body in ["", "not json", "null"] {
            let (status, reply) = handle_auth_request(body);
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(reply.message, "Invalid request format");
        }
    }

    #[tokio::test]
    async fn test_local_backend_errors_carry_server_message() {
        let backend = LocalAuthBackend;
        let err = backend
            .login(&credentials("admin@gmail.com", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");

        let ok = backend
            .login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
            .await
            .unwrap();
        assert!(ok.success);
    }

    #[test]
    fn test_interpret_falls_back_to_generic_message() {
        let err = interpret_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>").unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    #[tokio::test]
    async fn test_remote_backend() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"success":false,"message":"Invalid email or password"}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = RemoteAuthBackend::new(Client::new(), mock_server.uri());
        let err = backend
            .login(&credentials("someone@example.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Invalid email or password"));
    }
}
