//! Account list and management view (`/account`)
//!
//! The list is fetched on entry. Selecting an account refreshes its
//! details; create, update and history open as dialogs on top.

use crate::models::account::{Account, AccountType};
use crate::services::AccountService;

use super::history::HistoryView;
use super::ViewError;

#[derive(Debug, Clone)]
pub struct CreateAccountForm {
    pub account_type: AccountType,
    pub account_name: String,
    error: Option<String>,
}

impl Default for CreateAccountForm {
    fn default() -> Self {
        Self {
            account_type: AccountType::Checking,
            account_name: String::new(),
            error: None,
        }
    }
}

impl CreateAccountForm {
    /// The created account, once the backend accepted it
    pub async fn submit(&mut self, accounts: &AccountService) -> Option<Account> {
        match accounts
            .create_account(self.account_type, &self.account_name)
            .await
        {
            Ok(account) => {
                self.error = None;
                Some(account)
            }
            Err(e) => {
                tracing::error!("Error creating account: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct UpdateAccountForm {
    pub account_id: String,
    pub account_name: String,
    pub balance: f64,
    error: Option<String>,
}

impl UpdateAccountForm {
    pub fn for_account(account: &Account) -> Self {
        Self {
            account_id: account.account_id.clone(),
            account_name: account.account_name.clone(),
            balance: account.balance,
            error: None,
        }
    }

    pub async fn submit(&mut self, accounts: &AccountService) -> Option<Account> {
        match accounts
            .update_account(&self.account_id, &self.account_name, self.balance)
            .await
        {
            Ok(account) => {
                self.error = None;
                Some(account)
            }
            Err(e) => {
                tracing::error!("Error updating account {}: {}", self.account_id, e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone)]
pub enum Dialog {
    Create(CreateAccountForm),
    Update(UpdateAccountForm),
    History(HistoryView),
}

#[derive(Debug, Clone, Default)]
pub struct AccountManagementView {
    accounts: Vec<Account>,
    selected: Option<usize>,
    loaded: bool,
    error: Option<String>,
    notice: Option<String>,
    dialog: Option<Dialog>,
}

impl AccountManagementView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, accounts: &AccountService) {
        match accounts.get_accounts().await {
            Ok(list) => {
                tracing::debug!("Loaded {} accounts", list.len());
                self.accounts = list;
                self.error = None;
            }
            Err(e) => {
                tracing::error!("Error fetching accounts: {}", e);
                self.accounts.clear();
                self.error = Some(e.to_string());
            }
        }
        self.selected = None;
        self.loaded = true;
    }

    /// Select an account and refresh its details from the backend
    pub async fn select(
        &mut self,
        index: usize,
        accounts: &AccountService,
    ) -> Result<(), ViewError> {
        let account_id = self
            .accounts
            .get(index)
            .map(|a| a.account_id.clone())
            .ok_or(ViewError::NoSuchAccount(index))?;
        self.selected = Some(index);
        self.notice = None;

        match accounts.get_account(&account_id).await {
            Ok(fresh) => {
                if let Some(slot) = self.accounts.get_mut(index) {
                    slot.refresh_from(fresh);
                }
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Could not refresh account {}: {}", account_id, e);
                self.error = Some(e.to_string());
            }
        }
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.notice = None;
        self.dialog = Some(Dialog::Create(CreateAccountForm::default()));
    }

    pub fn open_update(&mut self) -> Result<(), ViewError> {
        let form = UpdateAccountForm::for_account(self.require_selected()?);
        self.notice = None;
        self.dialog = Some(Dialog::Update(form));
        Ok(())
    }

    pub async fn open_history(&mut self, accounts: &AccountService) -> Result<(), ViewError> {
        let mut history = HistoryView::new(self.require_selected()?.clone());
        history.load(accounts).await;
        self.dialog = Some(Dialog::History(history));
        Ok(())
    }

    /// Submit the open create or update dialog
    ///
    /// On success the dialog closes, a notice replaces it and the list is
    /// fetched again.
    pub async fn submit_dialog(&mut self, accounts: &AccountService) -> Result<bool, ViewError> {
        let notice = match self.dialog.as_mut() {
            Some(Dialog::Create(form)) => form
                .submit(accounts)
                .await
                .map(|a| format!("Created account '{}' ({})", a.display_name(), a.account_id)),
            Some(Dialog::Update(form)) => form
                .submit(accounts)
                .await
                .map(|a| format!("Updated account {}", a.account_id)),
            Some(Dialog::History(_)) | None => {
                return Err(ViewError::Form("Nothing to submit".to_string()))
            }
        };

        let Some(notice) = notice else {
            return Ok(false);
        };
        self.dialog = None;
        self.load(accounts).await;
        self.notice = Some(notice);
        Ok(true)
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut Dialog> {
        self.dialog.as_mut()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn selected_account(&self) -> Option<&Account> {
        self.selected.and_then(|i| self.accounts.get(i))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Outcome of the last successful create or update
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn require_selected(&self) -> Result<&Account, ViewError> {
        self.selected_account()
            .ok_or_else(|| ViewError::Form("Select an account first".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_list(server: &MockServer, accounts: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/account/accounts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "accounts": accounts })),
            )
            .mount(server)
            .await;
    }

    fn service(server: &MockServer) -> AccountService {
        AccountService::new(ApiClient::new(server.uri(), None).unwrap())
    }

    #[tokio::test]
    async fn test_load_and_select_refreshes_details() {
        let server = MockServer::start().await;
        mount_list(
            &server,
            serde_json::json!([{"account_id": "A1", "account_name": "Main", "balance": 1.0}]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/api/account/A1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "account": {"account_id": "A1", "account_name": "Main", "balance": 250.0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let svc = service(&server);
        let mut view = AccountManagementView::new();
        view.load(&svc).await;
        assert_eq!(view.accounts().len(), 1);

        view.select(0, &svc).await.unwrap();
        assert_eq!(view.selected_account().unwrap().balance, 250.0);
        assert_eq!(view.select(3, &svc).await, Err(ViewError::NoSuchAccount(3)));
    }

    #[tokio::test]
    async fn test_create_dialog_reloads_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/account/create"))
            .and(body_json(serde_json::json!({"account_type": "Savings", "account_name": "Rainy day"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": {"account": {"account_id": "S1", "account_name": "Rainy day"}}
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, serde_json::json!([{"account_id": "S1"}])).await;

        let svc = service(&server);
        let mut view = AccountManagementView::new();
        view.open_create();
        if let Some(Dialog::Create(form)) = view.dialog_mut() {
            form.account_type = AccountType::Savings;
            form.account_name = "Rainy day".to_string();
        }

        assert_eq!(view.submit_dialog(&svc).await, Ok(true));
        assert!(view.dialog().is_none());
        assert_eq!(view.accounts()[0].account_id, "S1");
        assert_eq!(view.notice(), Some("Created account 'Rainy day' (S1)"));
    }

    #[tokio::test]
    async fn test_create_dialog_requires_name() {
        let server = MockServer::start().await;
        let svc = service(&server);

        let mut view = AccountManagementView::new();
        view.open_create();

        assert_eq!(view.submit_dialog(&svc).await, Ok(false));
        match view.dialog() {
            Some(Dialog::Create(form)) => {
                assert_eq!(form.error(), Some("Account name is required"))
            }
            _ => panic!("create dialog should stay open"),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_after_select_keeps_listed_name() {
        let server = MockServer::start().await;
        mount_list(
            &server,
            serde_json::json!([{"account_id": "A1", "account_name": "Main", "account_type": 0, "balance": 10.0}]),
        )
        .await;
        // Single-account reply of the gateway carries no name
        Mock::given(method("GET"))
            .and(path("/api/account/A1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "account": {"id": "A1", "user_id": "u-1", "account_type": 0, "balance": 10.0}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/account/update"))
            .and(body_json(serde_json::json!({"account_id": "A1", "account_name": "Main", "balance": 50.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "account": {"id": "A1", "balance": 50.0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let svc = service(&server);
        let mut view = AccountManagementView::new();
        view.load(&svc).await;
        view.select(0, &svc).await.unwrap();
        assert_eq!(view.selected_account().unwrap().account_name, "Main");

        view.open_update().unwrap();
        if let Some(Dialog::Update(form)) = view.dialog_mut() {
            assert_eq!(form.account_name, "Main");
            form.balance = 50.0;
        }

        assert_eq!(view.submit_dialog(&svc).await, Ok(true));
        assert!(view.dialog().is_none());
        assert_eq!(view.notice(), Some("Updated account A1"));
    }

    #[tokio::test]
    async fn test_update_needs_selection() {
        let mut view = AccountManagementView::new();
        assert!(view.open_update().is_err());

        let server = MockServer::start().await;
        let svc = service(&server);
        assert!(view.open_history(&svc).await.is_err());
        assert_eq!(
            view.submit_dialog(&svc).await,
            Err(ViewError::Form("Nothing to submit".to_string()))
        );
    }

    #[tokio::test]
    async fn test_load_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/account/accounts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut view = AccountManagementView::new();
        view.load(&service(&server)).await;

        assert!(view.is_loaded());
        assert!(view.accounts().is_empty());
        assert!(view.error().is_some());
    }
}
