//! Auth service
//!
//! Login, registration, logout and the current-user lookup. Login is
//! the only writer of a new session; the interceptor and `logout` are
//! the only places it is cleared.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::models::session::{Session, SessionBuilder};
use crate::models::user::{Credentials, LoginResponse, User, UserResponse};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(client: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }

    /// Authenticate and store the returned token
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let body = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.client.post("/api/auth/login", &body).await?;

        if response.token.is_empty() {
            return Err(ApiError::InvalidResponse("login returned an empty token".to_string()));
        }

        let session = SessionBuilder::new(response.token).email(body.email).build();
        self.session.set(session.clone())?;

        tracing::info!("Logged in as {}", email.trim());
        Ok(session)
    }

    /// Create a user; does not log in
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: UserResponse = self.client.post("/api/auth/register", &body).await?;

        tracing::info!("Registered user {}", response.data.user.id);
        Ok(response.data.user)
    }

    /// End the session on the backend; the local copy is dropped regardless
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result: Result<serde_json::Value, ApiError> =
            self.client.get("/api/auth/logout").await;

        if let Err(e) = self.session.clear() {
            tracing::error!("Failed to remove stored session: {}", e);
        }

        result?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        let response: UserResponse = self.client.get("/api/auth/users/me").await?;
        Ok(response.data.user)
    }
}
