//! Deposit and withdrawal views
//!
//! Both share one state machine:
//!
//! ```text
//! LoadingAccounts -> Ready -> Submitting -> SuccessModal
//!        |             ^          |
//!        v             +----------+ (failure, error kept for display)
//!      Error
//! ```
//!
//! `Error` is only entered when the account list cannot be loaded; the
//! view stays usable from there.

use crate::api::ApiError;
use crate::models::account::Account;
use crate::models::transfer::{DepositRequest, TransferReceipt, TransferRequest, WithdrawalRequest};
use crate::router::Route;
use crate::services::{AccountService, BankService};

use super::ViewError;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    LoadingAccounts,
    Ready,
    Submitting,
    SuccessModal(TransferReceipt),
    Error(String),
}

/// Account picker plus pending request
#[derive(Debug, Clone)]
pub struct TransferFlow<R: TransferRequest> {
    accounts: Vec<Account>,
    selected: Option<usize>,
    request: R,
    state: FlowState,
    last_error: Option<String>,
}

impl<R: TransferRequest> Default for TransferFlow<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TransferRequest> TransferFlow<R> {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            selected: None,
            request: R::default(),
            state: FlowState::LoadingAccounts,
            last_error: None,
        }
    }

    /// Apply the result of the on-entry account fetch
    ///
    /// The first account becomes the source. With no accounts the source
    /// stays empty.
    pub fn accounts_loaded(&mut self, result: Result<Vec<Account>, ApiError>) {
        match result {
            Ok(accounts) => {
                self.accounts = accounts;
                self.selected = if self.accounts.is_empty() { None } else { Some(0) };
                let source = self
                    .selected_account()
                    .map(|a| a.account_id.clone())
                    .unwrap_or_default();
                self.request.set_source_account(source);
                self.state = FlowState::Ready;
            }
            Err(e) => {
                tracing::error!("Error fetching accounts: {}", e);
                self.state = FlowState::Error(e.to_string());
            }
        }
    }

    /// Change the source account; no round trip
    pub fn select_account(&mut self, index: usize) -> Result<(), ViewError> {
        let account_id = self
            .accounts
            .get(index)
            .map(|a| a.account_id.clone())
            .ok_or(ViewError::NoSuchAccount(index))?;

        self.selected = Some(index);
        self.request.set_source_account(account_id);
        Ok(())
    }

    /// Same bounds a numeric form input with `min="0"` enforces
    pub fn set_amount(&mut self, amount: f64) -> Result<(), ViewError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ViewError::InvalidAmount);
        }
        self.request.set_amount(amount);
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, FlowState::Ready | FlowState::Error(_))
    }

    /// Enter `Submitting` and hand out the request to send
    pub fn begin_submit(&mut self) -> Result<R, ViewError> {
        if !self.can_submit() {
            return Err(ViewError::Busy);
        }
        self.state = FlowState::Submitting;
        Ok(self.request.clone())
    }

    pub fn finish_submit(&mut self, result: Result<TransferReceipt, ApiError>) {
        match result {
            Ok(receipt) => {
                self.last_error = None;
                self.state = FlowState::SuccessModal(receipt);
            }
            Err(e) => {
                tracing::error!("Transfer failed: {}", e);
                self.last_error = Some(e.to_string());
                self.state = FlowState::Ready;
            }
        }
    }

    /// Dismiss the confirmation; the selected source is kept
    pub fn close_modal(&mut self) {
        if !self.is_modal_open() {
            return;
        }
        let source = self.request.source_account().to_string();
        self.request = R::default();
        self.request.set_source_account(source);
        self.state = FlowState::Ready;
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.state, FlowState::SuccessModal(_))
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn selected_account(&self) -> Option<&Account> {
        self.selected.and_then(|i| self.accounts.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn request(&self) -> &R {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut R {
        &mut self.request
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// `/deposit` and, with the agent flag preset, `/admin`
#[derive(Debug, Clone, Default)]
pub struct DepositView {
    flow: TransferFlow<DepositRequest>,
}

impl DepositView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank agent deposit: no balance check on the source account
    pub fn admin() -> Self {
        let mut view = Self::default();
        view.flow.request_mut().is_bank_agent = true;
        view
    }

    pub async fn load(&mut self, accounts: &AccountService) {
        let result = accounts.get_accounts().await;
        self.flow.accounts_loaded(result);
    }

    pub fn set_destination(&mut self, account_id: impl Into<String>) {
        self.flow.request_mut().to_account_id = account_id.into();
    }

    pub fn set_bank_agent(&mut self, is_bank_agent: bool) {
        self.flow.request_mut().is_bank_agent = is_bank_agent;
    }

    pub async fn submit(&mut self, bank: &BankService) -> Result<(), ViewError> {
        let request = self.flow.begin_submit()?;
        let result = bank.deposit(&request).await;
        self.flow.finish_submit(result);
        Ok(())
    }

    /// Close the modal; the app shell then follows the returned route
    pub fn redirect_to_account(&mut self) -> Route {
        self.flow.close_modal();
        Route::Account
    }

    pub fn flow(&self) -> &TransferFlow<DepositRequest> {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut TransferFlow<DepositRequest> {
        &mut self.flow
    }
}

/// `/withdrawal`
#[derive(Debug, Clone, Default)]
pub struct WithdrawalView {
    flow: TransferFlow<WithdrawalRequest>,
}

impl WithdrawalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, accounts: &AccountService) {
        let result = accounts.get_accounts().await;
        self.flow.accounts_loaded(result);
    }

    pub async fn submit(&mut self, bank: &BankService) -> Result<(), ViewError> {
        let request = self.flow.begin_submit()?;
        let result = bank.withdraw(&request).await;
        self.flow.finish_submit(result);
        Ok(())
    }

    pub fn redirect_to_account(&mut self) -> Route {
        self.flow.close_modal();
        Route::Account
    }

    pub fn flow(&self) -> &TransferFlow<WithdrawalRequest> {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut TransferFlow<WithdrawalRequest> {
        &mut self.flow
    }
}
