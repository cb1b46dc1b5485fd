//! View state for each route
//!
//! Views own their form state and render nothing themselves; the shell
//! draws whatever the active view holds.

pub mod accounts;
pub mod auth;
pub mod history;
pub mod transfer;

use thiserror::Error;

use crate::router::Route;

pub use accounts::{AccountManagementView, Dialog};
pub use auth::{LoginForm, RegisterForm};
pub use history::{HistoryRow, HistoryView, HISTORY_COLUMNS};
pub use transfer::{DepositView, FlowState, TransferFlow, WithdrawalView};

/// Input rejected by a view before anything is sent
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("No account at position {0}")]
    NoSuchAccount(usize),

    #[error("Amount must be a non-negative number")]
    InvalidAmount,

    #[error("A request is already in progress")]
    Busy,

    #[error("{0}")]
    Form(String),
}

/// The view mounted for the current route
#[derive(Debug, Clone)]
pub enum View {
    Login(LoginForm),
    Register(RegisterForm),
    Deposit(DepositView),
    Withdrawal(WithdrawalView),
    Account(AccountManagementView),
    Admin(DepositView),
}

impl View {
    /// Fresh, unloaded view for a route
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Login => View::Login(LoginForm::default()),
            Route::Register => View::Register(RegisterForm::default()),
            Route::Deposit => View::Deposit(DepositView::new()),
            Route::Withdrawal => View::Withdrawal(WithdrawalView::new()),
            Route::Account => View::Account(AccountManagementView::new()),
            Route::Admin => View::Admin(DepositView::admin()),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            View::Login(_) => Route::Login,
            View::Register(_) => Route::Register,
            View::Deposit(_) => Route::Deposit,
            View::Withdrawal(_) => Route::Withdrawal,
            View::Account(_) => Route::Account,
            View::Admin(_) => Route::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_for_every_route() {
        for route in Route::ALL {
            assert_eq!(View::for_route(route).route(), route);
        }
    }

    #[test]
    fn test_admin_view_presets_agent_flag() {
        match View::for_route(Route::Admin) {
            View::Admin(view) => assert!(view.flow().request().is_bank_agent),
            other => panic!("unexpected view: {:?}", other.route()),
        }
    }
}
