//! Account service
//!
//! Stateless façade over `/api/account` and `/api/history`. One request
//! per call: no retries, no batching, no caching.

use crate::api::{ApiClient, ApiError};
use crate::models::account::{
    Account, AccountEnvelope, AccountType, AccountsResponse, CreateAccountRequest,
    UpdateAccountRequest,
};
use crate::models::transaction::{HistoryResponse, Transaction};

#[derive(Clone)]
pub struct AccountService {
    client: ApiClient,
}

impl AccountService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create an account; the backend assigns the identifier
    pub async fn create_account(
        &self,
        account_type: AccountType,
        account_name: &str,
    ) -> Result<Account, ApiError> {
        let account_name = account_name.trim();
        if account_name.is_empty() {
            return Err(ApiError::Validation("Account name is required".to_string()));
        }

        let body = CreateAccountRequest {
            account_type,
            account_name: account_name.to_string(),
        };
        let envelope: AccountEnvelope = self.client.post("/api/account/create", &body).await?;

        tracing::info!("Created {} account '{}'", account_type, account_name);
        identified(envelope.into_account())
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Account, ApiError> {
        let path = format!("/api/account/{}", urlencoding::encode(account_id));
        let envelope: AccountEnvelope = self.client.get(&path).await?;
        identified(envelope.into_account())
    }

    /// Accounts of the logged-in user; an empty list is a normal result
    pub async fn get_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let response: AccountsResponse = self.client.get("/api/account/accounts").await?;
        response.accounts.into_iter().map(identified).collect()
    }

    /// Authorization is the backend's business; nothing is checked here
    pub async fn update_account(
        &self,
        account_id: &str,
        account_name: &str,
        balance: f64,
    ) -> Result<Account, ApiError> {
        let body = UpdateAccountRequest {
            account_id: account_id.to_string(),
            account_name: account_name.to_string(),
            balance,
        };
        let envelope: AccountEnvelope = self.client.put("/api/account/update", &body).await?;
        identified(envelope.into_account())
    }

    /// Transactions in backend order
    pub async fn get_transaction_history(
        &self,
        account_id: &str,
    ) -> Result<Vec<Transaction>, ApiError> {
        let path = format!(
            "/api/history/transactions/{}",
            urlencoding::encode(account_id)
        );
        let response: HistoryResponse = self.client.get(&path).await?;
        Ok(response.data.transactions)
    }
}

fn identified(account: Account) -> Result<Account, ApiError> {
    if account.is_identified() {
        Ok(account)
    } else {
        Err(ApiError::InvalidResponse(
            "account without an identifier".to_string(),
        ))
    }
}
