//! Login and registration forms

use crate::models::user::User;
use crate::router::Route;
use crate::services::AuthService;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl LoginForm {
    /// Returns the route to follow on success
    pub async fn submit(&mut self, auth: &AuthService) -> Option<Route> {
        match auth.login(&self.email, &self.password).await {
            Ok(_) => {
                self.error = None;
                self.password.clear();
                Some(Route::Account)
            }
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
    registered: Option<User>,
}

impl RegisterForm {
    /// Registration does not log in; success leads to the login page
    pub async fn submit(&mut self, auth: &AuthService) -> Option<Route> {
        match auth.register(&self.email, &self.password).await {
            Ok(user) => {
                self.error = None;
                self.registered = Some(user);
                Some(Route::Login)
            }
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn registered(&self) -> Option<&User> {
        self.registered.as_ref()
    }
}
