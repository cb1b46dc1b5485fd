//! Transaction history for one account

use serde::{Deserialize, Serialize};

use crate::models::account::Account;
use crate::models::transaction::Transaction;
use crate::services::AccountService;

/// Columns shown in the history table
pub const HISTORY_COLUMNS: [&str; 3] = ["transaction_id", "transaction_type", "amount"];

/// Display row; the numeric type code is replaced by its label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub transaction_id: String,
    pub account_id: String,
    pub transaction_type: String,
    pub amount: f64,
    pub timestamp: Option<String>,
}

impl From<&Transaction> for HistoryRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            account_id: tx.account_id.clone(),
            transaction_type: tx.kind().label().to_string(),
            amount: tx.amount,
            timestamp: tx.timestamp.as_ref().map(|t| t.to_string()),
        }
    }
}

impl HistoryRow {
    /// Cell text for one of [`HISTORY_COLUMNS`]
    pub fn cell(&self, column: &str) -> String {
        match column {
            "transaction_id" => self.transaction_id.clone(),
            "transaction_type" => self.transaction_type.clone(),
            "amount" => format!("{:.2}", self.amount),
            "account_id" => self.account_id.clone(),
            "timestamp" => self.timestamp.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryView {
    account: Account,
    rows: Vec<HistoryRow>,
    loaded: bool,
    error: Option<String>,
}

impl HistoryView {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            rows: Vec::new(),
            loaded: false,
            error: None,
        }
    }

    pub async fn load(&mut self, accounts: &AccountService) {
        match accounts
            .get_transaction_history(&self.account.account_id)
            .await
        {
            Ok(transactions) => {
                self.rows = transactions.iter().map(HistoryRow::from).collect();
                self.error = None;
            }
            Err(e) => {
                tracing::error!(
                    "Error fetching history for {}: {}",
                    self.account.account_id,
                    e
                );
                self.rows.clear();
                self.error = Some(e.to_string());
            }
        }
        self.loaded = true;
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Rows in the order the backend returned them
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &HISTORY_COLUMNS
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::models::transaction::Timestamp;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tx(id: &str, code: Option<i64>, amount: f64) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            account_id: "A1".to_string(),
            transaction_type: code,
            amount,
            timestamp: None,
        }
    }

    fn account() -> Account {
        Account {
            account_id: "A1".to_string(),
            account_name: "Main".to_string(),
            account_type: None,
            balance: 0.0,
            user_id: None,
        }
    }

    #[test]
    fn test_type_code_labels() {
        assert_eq!(HistoryRow::from(&tx("t1", Some(0), 1.0)).transaction_type, "Deposit");
        assert_eq!(HistoryRow::from(&tx("t2", Some(1), 1.0)).transaction_type, "Withdrawal");
        assert_eq!(HistoryRow::from(&tx("t3", Some(7), 1.0)).transaction_type, "Withdrawal");
        assert_eq!(HistoryRow::from(&tx("t4", None, 1.0)).transaction_type, "Withdrawal");
    }

    #[test]
    fn test_cells() {
        let mut source = tx("t1", Some(0), 12.5);
        source.timestamp = Some(Timestamp::Unix(0));
        let row = HistoryRow::from(&source);

        let cells: Vec<String> = HISTORY_COLUMNS.iter().map(|c| row.cell(c)).collect();
        assert_eq!(cells, vec!["t1", "Deposit", "12.50"]);
        assert_eq!(row.cell("timestamp"), "1970-01-01T00:00:00+00:00");
        assert_eq!(row.cell("unknown"), "");
    }

    #[tokio::test]
    async fn test_load_keeps_backend_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/history/transactions/A1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": {"transactions": [
                    {"transaction_id": "t9", "account_id": "A1", "transaction_type": 1, "amount": 5.0},
                    {"transaction_id": "t2", "account_id": "A1", "transaction_type": 0, "amount": 50.0}
                ]}
            })))
            .mount(&server)
            .await;

        let service = AccountService::new(ApiClient::new(server.uri(), None).unwrap());
        let mut view = HistoryView::new(account());
        view.load(&service).await;

        let ids: Vec<&str> = view.rows().iter().map(|r| r.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["t9", "t2"]);
        assert_eq!(view.rows()[0].transaction_type, "Withdrawal");
        assert_eq!(view.rows()[1].transaction_type, "Deposit");
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/history/transactions/A1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let service = AccountService::new(ApiClient::new(server.uri(), None).unwrap());
        let mut view = HistoryView::new(account());
        view.load(&service).await;

        assert!(view.is_loaded());
        assert!(view.rows().is_empty());
        assert!(view.error().unwrap().contains("404"));
    }
}
