//! bankdesk - terminal client for the bank REST API
//!
//! This library provides everything behind the `bankdesk` binary.
//! It handles:
//! - Session persistence and bearer-token injection
//! - Forced logout when the backend answers 401
//! - Account, history and transfer calls
//! - Per-route view state and the command layer driving it
//! - CSV/JSON export of transaction history

pub mod api;
pub mod commands;
pub mod config;
pub mod export;
pub mod models;
pub mod router;
pub mod services;
pub mod session;
pub mod shell;
pub mod views;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::{Mutex, MutexGuard};

use api::{ApiClient, AuthInterceptor};
use config::AppConfig;
use router::{Route, Router};
use services::{AccountService, AuthService, BankService};
use session::SessionStore;
use views::View;

/// The mounted view and the reset generation it was built under
#[derive(Debug)]
pub struct ActiveView {
    generation: u64,
    pub view: View,
}

/// Application state shared by every command
pub struct AppState {
    pub config: AppConfig,
    pub session: Arc<SessionStore>,
    pub router: Arc<Router>,
    pub auth: AuthService,
    pub accounts: AccountService,
    pub bank: BankService,
    active: Mutex<ActiveView>,
}

impl AppState {
    /// Open the configured session file (if any) and wire the services
    pub fn new(config: AppConfig) -> Result<Self, CommandError> {
        let session = match &config.session_file {
            Some(path) => SessionStore::open(path.clone()),
            None => SessionStore::in_memory(),
        };
        Self::with_session(config, Arc::new(session))
    }

    pub fn with_session(config: AppConfig, session: Arc<SessionStore>) -> Result<Self, CommandError> {
        let router = Arc::new(Router::new());
        let client = ApiClient::new(config.api_url.clone(), config.timeout)?
            .with_interceptor(Arc::new(AuthInterceptor::new(session.clone(), router.clone())));

        let active = ActiveView {
            generation: router.generation(),
            view: View::for_route(router.current()),
        };

        Ok(Self {
            auth: AuthService::new(client.clone(), session.clone()),
            accounts: AccountService::new(client.clone()),
            bank: BankService::new(client),
            config,
            session,
            router,
            active: Mutex::new(active),
        })
    }

    /// Lock the mounted view, discarding it first if a reset happened
    pub async fn lock_view(&self) -> MutexGuard<'_, ActiveView> {
        let mut active = self.active.lock().await;
        self.reset_if_stale(&mut active);
        active
    }

    /// Drop view state built before the last forced logout
    ///
    /// Returns true when the view was replaced.
    pub fn reset_if_stale(&self, active: &mut ActiveView) -> bool {
        let generation = self.router.generation();
        if active.generation == generation {
            return false;
        }

        active.generation = generation;

        // A mounted login form holds no session state; keep its error
        let route = self.router.current();
        if route == Route::Login && active.view.route() == Route::Login {
            return false;
        }

        tracing::info!("Discarding view state after session reset");
        active.view = View::for_route(route);
        true
    }

    pub fn current_route(&self) -> Route {
        self.router.current()
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config
            .export_dir
            .clone()
            .unwrap_or_else(export::get_export_directory)
    }
}

/// Error type for commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error("Session storage error: {0}")]
    Session(#[from] session::SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    View(#[from] views::ViewError),

    #[error("'{command}' is not available on {route}")]
    NotAvailable { command: &'static str, route: Route },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Rendered as its message
impl serde::Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// ============================================================================
// Application Setup
// ============================================================================

pub fn run() {
    let cli = config::Cli::parse();

    // Logs go to stderr; stdout belongs to the rendered view
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bankdesk=info,bankdesk_lib=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting bankdesk");

    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    tracing::info!("API base URL: {}", config.api_url);
    if let Some(path) = &config.session_file {
        tracing::info!("Session file: {:?}", path);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result: Result<(), CommandError> = runtime.block_on(async move {
        let state = AppState::new(config)?;
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        shell::run_shell(&state, stdin, tokio::io::stdout()).await
    });

    if let Err(e) = result {
        tracing::error!("bankdesk stopped: {}", e);
        std::process::exit(1);
    }
}
