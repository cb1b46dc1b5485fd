//! Command handlers
//!
//! Every user action goes through here. A command locks the mounted
//! view, works on it, and re-checks the reset generation before
//! returning, so a 401 during the command leaves the login view mounted.

use std::path::PathBuf;

use crate::export::{export_history, ExportFormat};
use crate::models::account::AccountType;
use crate::models::user::User;
use crate::router::Route;
use crate::views::{Dialog, View};
use crate::{ActiveView, AppState, CommandError};

// ============================================================================
// Navigation
// ============================================================================

/// Mount the view for `path`, fetching whatever it shows on entry
pub async fn navigate(state: &AppState, path: &str) -> Result<Route, CommandError> {
    let mut active = state.lock_view().await;
    go(state, &mut active, path).await;
    Ok(active.view.route())
}

/// Mount the current route again with fresh data
pub async fn reload(state: &AppState) -> Result<Route, CommandError> {
    let path = state.current_route().path();
    navigate(state, path).await
}

async fn go(state: &AppState, active: &mut ActiveView, path: &str) {
    let route = state.router.navigate(path, &state.session);
    let mut view = View::for_route(route);

    match &mut view {
        View::Deposit(v) | View::Admin(v) => v.load(&state.accounts).await,
        View::Withdrawal(v) => v.load(&state.accounts).await,
        View::Account(v) => v.load(&state.accounts).await,
        View::Login(_) | View::Register(_) => {}
    }

    active.view = view;
    state.reset_if_stale(active);
}

// ============================================================================
// Auth
// ============================================================================

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<Route, CommandError> {
    let mut active = state.lock_view().await;
    if active.view.route() != Route::Login {
        go(state, &mut active, Route::Login.path()).await;
    }

    let next = match &mut active.view {
        View::Login(form) => {
            form.email = email.to_string();
            form.password = password.to_string();
            form.submit(&state.auth).await
        }
        other => return Err(not_available("login", other)),
    };

    if let Some(route) = next {
        go(state, &mut active, route.path()).await;
    }
    Ok(active.view.route())
}

pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<Route, CommandError> {
    let mut active = state.lock_view().await;
    if active.view.route() != Route::Register {
        go(state, &mut active, Route::Register.path()).await;
    }

    let next = match &mut active.view {
        View::Register(form) => {
            form.email = email.to_string();
            form.password = password.to_string();
            form.submit(&state.auth).await
        }
        other => return Err(not_available("register", other)),
    };

    if let Some(route) = next {
        go(state, &mut active, route.path()).await;
    }
    Ok(active.view.route())
}

/// End the session and wipe all view state
pub async fn logout(state: &AppState) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    let result = state.auth.logout().await;

    state.router.reset_to_login();
    state.reset_if_stale(&mut active);

    result?;
    Ok(())
}

pub async fn whoami(state: &AppState) -> Result<User, CommandError> {
    let mut active = state.lock_view().await;
    let result = state.auth.me().await;
    state.reset_if_stale(&mut active);
    Ok(result?)
}

// ============================================================================
// Transfer forms
// ============================================================================

/// Pick an account: the transfer source, or the managed account
pub async fn select_account(state: &AppState, index: usize) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    match &mut active.view {
        View::Deposit(v) | View::Admin(v) => v.flow_mut().select_account(index)?,
        View::Withdrawal(v) => v.flow_mut().select_account(index)?,
        View::Account(v) => v.select(index, &state.accounts).await?,
        other => return Err(not_available("select", other)),
    }
    state.reset_if_stale(&mut active);
    Ok(())
}

pub async fn set_amount(state: &AppState, amount: f64) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    match &mut active.view {
        View::Deposit(v) | View::Admin(v) => v.flow_mut().set_amount(amount)?,
        View::Withdrawal(v) => v.flow_mut().set_amount(amount)?,
        other => return Err(not_available("amount", other)),
    }
    Ok(())
}

pub async fn set_destination(state: &AppState, account_id: &str) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    match &mut active.view {
        View::Deposit(v) | View::Admin(v) => v.set_destination(account_id.trim()),
        other => return Err(not_available("to", other)),
    }
    Ok(())
}

pub async fn set_bank_agent(state: &AppState, is_bank_agent: bool) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    match &mut active.view {
        View::Deposit(v) | View::Admin(v) => v.set_bank_agent(is_bank_agent),
        other => return Err(not_available("agent", other)),
    }
    Ok(())
}

/// Submit the current form
///
/// Transfer views post the pending request; the account view submits
/// its open create or update dialog.
pub async fn submit(state: &AppState) -> Result<Route, CommandError> {
    let mut active = state.lock_view().await;
    match &mut active.view {
        View::Deposit(v) | View::Admin(v) => v.submit(&state.bank).await?,
        View::Withdrawal(v) => v.submit(&state.bank).await?,
        View::Account(v) => {
            v.submit_dialog(&state.accounts).await?;
        }
        other => return Err(not_available("submit", other)),
    }
    state.reset_if_stale(&mut active);
    Ok(active.view.route())
}

/// Close the success modal or the open dialog
pub async fn close(state: &AppState) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    match &mut active.view {
        View::Deposit(v) | View::Admin(v) => v.flow_mut().close_modal(),
        View::Withdrawal(v) => v.flow_mut().close_modal(),
        View::Account(v) => v.close_dialog(),
        other => return Err(not_available("close", other)),
    }
    Ok(())
}

/// Leave a successful transfer for the account view
pub async fn finish_transfer(state: &AppState) -> Result<Route, CommandError> {
    let mut active = state.lock_view().await;
    let next = match &mut active.view {
        View::Deposit(v) | View::Admin(v) if v.flow().is_modal_open() => v.redirect_to_account(),
        View::Withdrawal(v) if v.flow().is_modal_open() => v.redirect_to_account(),
        other => return Err(not_available("done", other)),
    };
    go(state, &mut active, next.path()).await;
    Ok(active.view.route())
}

// ============================================================================
// Account management
// ============================================================================

pub async fn open_create_dialog(
    state: &AppState,
    account_type: AccountType,
    account_name: &str,
) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    let view = match &mut active.view {
        View::Account(v) => v,
        other => return Err(not_available("create", other)),
    };

    view.open_create();
    if let Some(Dialog::Create(form)) = view.dialog_mut() {
        form.account_type = account_type;
        form.account_name = account_name.to_string();
    }
    Ok(())
}

pub async fn open_update_dialog(
    state: &AppState,
    account_name: Option<&str>,
    balance: Option<f64>,
) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    let view = match &mut active.view {
        View::Account(v) => v,
        other => return Err(not_available("update", other)),
    };

    view.open_update()?;
    if let Some(Dialog::Update(form)) = view.dialog_mut() {
        if let Some(name) = account_name {
            form.account_name = name.to_string();
        }
        if let Some(balance) = balance {
            form.balance = balance;
        }
    }
    Ok(())
}

pub async fn open_history(state: &AppState) -> Result<(), CommandError> {
    let mut active = state.lock_view().await;
    match &mut active.view {
        View::Account(v) => v.open_history(&state.accounts).await?,
        other => return Err(not_available("history", other)),
    }
    state.reset_if_stale(&mut active);
    Ok(())
}

/// Write the rows of the open history dialog to the export directory
pub async fn export_open_history(
    state: &AppState,
    format: ExportFormat,
) -> Result<PathBuf, CommandError> {
    let active = state.lock_view().await;
    let history = match &active.view {
        View::Account(v) => match v.dialog() {
            Some(Dialog::History(history)) => history,
            _ => {
                return Err(CommandError::Internal(
                    "Open the history of an account before exporting".to_string(),
                ))
            }
        },
        other => return Err(not_available("export", other)),
    };

    export_history(
        &history.account().account_id,
        history.rows(),
        format,
        &state.export_dir(),
    )
}

/// Read access to the mounted view
pub async fn with_view<F, T>(state: &AppState, f: F) -> T
where
    F: FnOnce(&View) -> T,
{
    let active = state.lock_view().await;
    f(&active.view)
}

fn not_available(command: &'static str, view: &View) -> CommandError {
    CommandError::NotAvailable {
        command,
        route: view.route(),
    }
}
