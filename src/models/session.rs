//! Session data types
//!
//! The credential the front-end holds between login and logout

use serde::{Deserialize, Serialize};

/// Authenticated session record
///
/// The token is opaque: it is never decoded or validated client-side,
/// only attached to outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub email: Option<String>,
    pub created_at: String,
}

impl Session {
    /// Bearer token for the Authorization header
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Builder for creating session records
pub struct SessionBuilder {
    token: String,
    email: Option<String>,
    created_at: Option<String>,
}

impl SessionBuilder {
    /// Create a new session builder
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: None,
            created_at: None,
        }
    }

    /// Set the login identity
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set creation time
    pub fn created_at(mut self, created_at: String) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the session
    pub fn build(self) -> Session {
        Session {
            token: self.token,
            email: self.email,
            created_at: self
                .created_at
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_created_at() {
        let session = SessionBuilder::new("abc").build();
        assert_eq!(session.token(), "abc");
        assert!(session.email.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&session.created_at).is_ok());
    }

    #[test]
    fn test_builder_with_email() {
        let session = SessionBuilder::new("abc")
            .email("jane@example.com")
            .created_at("2026-01-01T00:00:00Z".to_string())
            .build();
        assert_eq!(session.email.as_deref(), Some("jane@example.com"));
        assert_eq!(session.created_at, "2026-01-01T00:00:00Z");
    }
}
