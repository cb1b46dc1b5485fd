//! Client-side routing
//!
//! Maps paths to views and owns the reset generation used to wipe
//! in-memory state after a forced logout.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::session::SessionStore;

/// Navigable views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Deposit,
    Withdrawal,
    Account,
    Admin,
}

lazy_static::lazy_static! {
    static ref ROUTE_TABLE: HashMap<&'static str, Route> = {
        let mut table = HashMap::new();
        table.insert("login", Route::Login);
        table.insert("register", Route::Register);
        table.insert("deposit", Route::Deposit);
        table.insert("withdrawal", Route::Withdrawal);
        table.insert("account", Route::Account);
        table.insert("admin", Route::Admin);
        table
    };
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Register,
        Route::Deposit,
        Route::Withdrawal,
        Route::Account,
        Route::Admin,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Deposit => "/deposit",
            Route::Withdrawal => "/withdrawal",
            Route::Account => "/account",
            Route::Admin => "/admin",
        }
    }

    /// Resolve a path; empty and unknown paths fall back to login
    pub fn resolve(path: &str) -> Route {
        let key = path.trim().trim_matches('/');
        ROUTE_TABLE.get(key).copied().unwrap_or(Route::Login)
    }

    /// Views that call authenticated endpoints
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Current route plus reset bookkeeping
#[derive(Debug)]
pub struct Router {
    current: RwLock<Route>,
    generation: AtomicU64,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Route::Login),
            generation: AtomicU64::new(0),
        }
    }

    pub fn current(&self) -> Route {
        self.current.read().map(|r| *r).unwrap_or(Route::Login)
    }

    /// Navigate to a path, redirecting to login when no session is held
    pub fn navigate(&self, path: &str, session: &SessionStore) -> Route {
        let mut route = Route::resolve(path);
        if route.requires_session() && !session.is_authenticated() {
            tracing::debug!("No session, redirecting {} to {}", route, Route::Login);
            route = Route::Login;
        }
        self.set(route);
        route
    }

    /// Force the login view and invalidate every view built so far
    pub fn reset_to_login(&self) {
        self.set(Route::Login);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Application state reset (generation {})", generation);
    }

    /// Bumped on every forced reset
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn set(&self, route: Route) {
        match self.current.write() {
            Ok(mut current) => *current = route,
            Err(poisoned) => *poisoned.into_inner() = route,
        }
    }
}
