//! Request/response interceptors
//!
//! Every call made through [`ApiClient`](super::ApiClient) passes through
//! the registered interceptors: `on_request` before sending, `on_error`
//! when the call fails for any reason.

use std::sync::Arc;

use reqwest::RequestBuilder;

use super::ApiError;
use crate::router::Router;
use crate::session::SessionStore;

/// Cross-cutting hook applied to every API call
pub trait Interceptor: Send + Sync {
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }

    /// Observe a failed call. The error is returned to the caller afterwards.
    fn on_error(&self, _error: &ApiError) {}
}

/// Attaches the session token and ends the session on 401
///
/// No retry and no backoff: a 401 is a logout trigger.
pub struct AuthInterceptor {
    session: Arc<SessionStore>,
    router: Arc<Router>,
}

impl AuthInterceptor {
    pub fn new(session: Arc<SessionStore>, router: Arc<Router>) -> Self {
        Self { session, router }
    }
}

impl Interceptor for AuthInterceptor {
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn on_error(&self, error: &ApiError) {
        if !error.is_unauthorized() {
            return;
        }

        tracing::warn!("Backend rejected credentials, ending session");

        if let Err(e) = self.session.clear() {
            tracing::error!("Failed to remove stored session: {}", e);
        }
        self.router.reset_to_login();
    }
}
