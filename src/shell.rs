//! Line-oriented terminal front end
//!
//! Reads one command per line, runs it, then prints the mounted view.
//! Accounts are numbered from 1 on screen.

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::commands;
use crate::export::ExportFormat;
use crate::models::account::{Account, AccountType};
use crate::views::{
    AccountManagementView, DepositView, Dialog, FlowState, HistoryView, TransferFlow, View,
    WithdrawalView,
};
use crate::models::transfer::TransferRequest;
use crate::{AppState, CommandError};

const HELP: &str = "\
commands:
  go <path>                 /login /register /deposit /withdrawal /account /admin
  reload                    fetch the current view again
  login <email> <password>
  register <email> <password>
  logout | whoami
  select <n>                choose account n
  amount <value>            transfer amount
  to <account_id>           deposit destination
  agent on|off              bank agent deposit
  submit                    send the current form
  close                     close the confirmation or dialog
  done                      after a transfer, go to your accounts
  create <checking|savings> <name>
  update <balance> [name]   edit the selected account
  history                   transactions of the selected account
  export <csv|json>         save the open history
  help | quit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Help,
    Quit,
    Go(String),
    Reload,
    Login { email: String, password: String },
    Register { email: String, password: String },
    Logout,
    WhoAmI,
    Select(usize),
    Amount(f64),
    To(String),
    Agent(bool),
    Submit,
    Close,
    Done,
    Create { account_type: AccountType, name: String },
    Update { balance: f64, name: Option<String> },
    History,
    Export(ExportFormat),
}

/// Parse a line; `Ok(None)` for blank input
pub fn parse(line: &str) -> Result<Option<Input>, String> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let input = match (command.to_lowercase().as_str(), args.as_slice()) {
        ("help" | "?", _) => Input::Help,
        ("quit" | "exit", _) => Input::Quit,
        ("go", [path]) => Input::Go(path.to_string()),
        ("go", []) => Input::Go("/".to_string()),
        ("reload", _) => Input::Reload,
        ("login", [email, password]) => Input::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
        ("register", [email, password]) => Input::Register {
            email: email.to_string(),
            password: password.to_string(),
        },
        ("logout", _) => Input::Logout,
        ("whoami", _) => Input::WhoAmI,
        ("select", [n]) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Input::Select(n - 1),
            _ => return Err(format!("not an account number: {}", n)),
        },
        ("amount", [value]) => Input::Amount(parse_number(value)?),
        ("to", [account_id]) => Input::To(account_id.to_string()),
        ("agent", ["on"]) => Input::Agent(true),
        ("agent", ["off"]) => Input::Agent(false),
        ("submit", _) => Input::Submit,
        ("close", _) => Input::Close,
        ("done", _) => Input::Done,
        ("create", [kind, name @ ..]) if !name.is_empty() => Input::Create {
            account_type: kind.parse().map_err(|e| format!("{}", e))?,
            name: name.join(" "),
        },
        ("update", [balance, name @ ..]) => Input::Update {
            balance: parse_number(balance)?,
            name: if name.is_empty() { None } else { Some(name.join(" ")) },
        },
        ("history", _) => Input::History,
        ("export", [format]) => Input::Export(format.parse().map_err(|e: CommandError| e.to_string())?),
        (other, _) => return Err(format!("unknown or incomplete command '{}', try 'help'", other)),
    };
    Ok(Some(input))
}

fn parse_number(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("not a number: {}", value))
}

/// Run one parsed input; returns a status line to print, if any
pub async fn execute(state: &AppState, input: Input) -> Result<Option<String>, CommandError> {
    let message = match input {
        Input::Help => Some(HELP.to_string()),
        Input::Quit => None,
        Input::Go(path) => {
            commands::navigate(state, &path).await?;
            None
        }
        Input::Reload => {
            commands::reload(state).await?;
            None
        }
        Input::Login { email, password } => {
            commands::login(state, &email, &password).await?;
            None
        }
        Input::Register { email, password } => {
            commands::register(state, &email, &password).await?;
            None
        }
        Input::Logout => {
            commands::logout(state).await?;
            Some("Logged out".to_string())
        }
        Input::WhoAmI => {
            let user = commands::whoami(state).await?;
            Some(format!("{} ({})", user.username, user.id))
        }
        Input::Select(index) => {
            commands::select_account(state, index).await?;
            None
        }
        Input::Amount(amount) => {
            commands::set_amount(state, amount).await?;
            None
        }
        Input::To(account_id) => {
            commands::set_destination(state, &account_id).await?;
            None
        }
        Input::Agent(on) => {
            commands::set_bank_agent(state, on).await?;
            None
        }
        Input::Submit => {
            commands::submit(state).await?;
            None
        }
        Input::Close => {
            commands::close(state).await?;
            None
        }
        Input::Done => {
            commands::finish_transfer(state).await?;
            None
        }
        Input::Create { account_type, name } => {
            commands::open_create_dialog(state, account_type, &name).await?;
            commands::submit(state).await?;
            None
        }
        Input::Update { balance, name } => {
            commands::open_update_dialog(state, name.as_deref(), Some(balance)).await?;
            commands::submit(state).await?;
            None
        }
        Input::History => {
            commands::open_history(state).await?;
            None
        }
        Input::Export(format) => {
            let path = commands::export_open_history(state, format).await?;
            Some(format!("Saved {}", path.display()))
        }
    };
    Ok(message)
}

/// Read-eval-print loop until EOF or `quit`
pub async fn run_shell<R, W>(state: &AppState, reader: R, mut writer: W) -> Result<(), CommandError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let start = if state.session.is_authenticated() {
        "/account"
    } else {
        "/login"
    };
    if let Err(e) = commands::navigate(state, start).await {
        tracing::error!("Failed to open {}: {}", start, e);
    }

    let screen = commands::with_view(state, render).await;
    writer.write_all(screen.as_bytes()).await?;

    let mut lines = reader.lines();
    loop {
        let prompt = format!("{}> ", state.current_route());
        writer.write_all(prompt.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = match parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(message) => {
                writer.write_all(format!("{}\n", message).as_bytes()).await?;
                continue;
            }
        };
        if input == Input::Quit {
            break;
        }

        let mut out = String::new();
        match execute(state, input).await {
            Ok(Some(message)) => {
                let _ = writeln!(out, "{}", message);
            }
            Ok(None) => {}
            Err(e) => {
                let _ = writeln!(out, "error: {}", e);
            }
        }
        out.push_str(&commands::with_view(state, render).await);
        writer.write_all(out.as_bytes()).await?;
    }

    writer.flush().await?;
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

/// Text rendering of a view
pub fn render(view: &View) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.route());

    match view {
        View::Login(form) => {
            let _ = writeln!(out, "email: {}", form.email);
            if let Some(error) = form.error() {
                let _ = writeln!(out, "error: {}", error);
            }
            let _ = writeln!(out, "login <email> <password> | go /register");
        }
        View::Register(form) => {
            if let Some(user) = form.registered() {
                let _ = writeln!(out, "registered {}", user.username);
            }
            if let Some(error) = form.error() {
                let _ = writeln!(out, "error: {}", error);
            }
            let _ = writeln!(out, "register <email> <password> | go /login");
        }
        View::Deposit(v) | View::Admin(v) => render_deposit(&mut out, v),
        View::Withdrawal(v) => render_withdrawal(&mut out, v),
        View::Account(v) => render_accounts(&mut out, v),
    }
    out
}

fn render_account_list(out: &mut String, accounts: &[Account], selected: Option<&Account>) {
    if accounts.is_empty() {
        let _ = writeln!(out, "no accounts");
        return;
    }
    for (i, account) in accounts.iter().enumerate() {
        let marker = match selected {
            Some(s) if s.account_id == account.account_id => '*',
            _ => ' ',
        };
        let kind = account
            .account_type
            .map(|t| t.label())
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "{} {}. {} [{}] {} {:.2}",
            marker,
            i + 1,
            account.display_name(),
            account.account_id,
            kind,
            account.balance
        );
    }
}

fn render_flow<R: TransferRequest>(out: &mut String, flow: &TransferFlow<R>) {
    if let FlowState::LoadingAccounts = flow.state() {
        let _ = writeln!(out, "loading accounts...");
        return;
    }
    render_account_list(out, flow.accounts(), flow.selected_account());
    if let FlowState::Error(message) = flow.state() {
        let _ = writeln!(out, "could not load accounts: {}", message);
    }
    let _ = writeln!(out, "from: {}", flow.request().source_account());
    let _ = writeln!(out, "amount: {:.2}", flow.request().amount());
}

fn render_status<R: TransferRequest>(out: &mut String, flow: &TransferFlow<R>) {
    if let FlowState::SuccessModal(receipt) = flow.state() {
        match &receipt.transaction_id {
            Some(id) => {
                let _ = writeln!(out, "[ Transaction successful: {} ]", id);
            }
            None => {
                let _ = writeln!(out, "[ Transaction successful ]");
            }
        }
        let _ = writeln!(out, "done: go to your accounts | close: stay here");
    }
    if let Some(error) = flow.last_error() {
        let _ = writeln!(out, "error: {}", error);
    }
}

fn render_deposit(out: &mut String, view: &DepositView) {
    let flow = view.flow();
    render_flow(out, flow);
    let _ = writeln!(out, "to: {}", flow.request().to_account_id);
    let _ = writeln!(out, "bank agent: {}", flow.request().is_bank_agent);
    render_status(out, flow);
}

fn render_withdrawal(out: &mut String, view: &WithdrawalView) {
    render_flow(out, view.flow());
    render_status(out, view.flow());
}

fn render_accounts(out: &mut String, view: &AccountManagementView) {
    if !view.is_loaded() {
        let _ = writeln!(out, "loading accounts...");
        return;
    }
    render_account_list(out, view.accounts(), view.selected_account());
    if let Some(error) = view.error() {
        let _ = writeln!(out, "error: {}", error);
    }
    if let Some(notice) = view.notice() {
        let _ = writeln!(out, "{}", notice);
    }

    match view.dialog() {
        Some(Dialog::Create(form)) => {
            let _ = writeln!(out, "-- new account: {} '{}' --", form.account_type, form.account_name);
            if let Some(error) = form.error() {
                let _ = writeln!(out, "error: {}", error);
            }
        }
        Some(Dialog::Update(form)) => {
            let _ = writeln!(
                out,
                "-- update {}: '{}' {:.2} --",
                form.account_id, form.account_name, form.balance
            );
            if let Some(error) = form.error() {
                let _ = writeln!(out, "error: {}", error);
            }
        }
        Some(Dialog::History(history)) => render_history(out, history),
        None => {}
    }
}

fn render_history(out: &mut String, history: &HistoryView) {
    let _ = writeln!(out, "-- history of {} --", history.account().display_name());
    if let Some(error) = history.error() {
        let _ = writeln!(out, "error: {}", error);
        return;
    }
    if history.rows().is_empty() {
        let _ = writeln!(out, "no transactions");
        return;
    }

    let _ = writeln!(out, "{}", history.columns().join(" | "));
    for row in history.rows() {
        let cells: Vec<String> = history.columns().iter().map(|c| row.cell(c)).collect();
        let _ = writeln!(out, "{}", cells.join(" | "));
    }
}
