//! Transaction data types
//!
//! Transactions are produced by the backend as a side effect of deposits
//! and withdrawals and are read-only here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display kind derived from the backend's numeric type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    /// 0 is a deposit; every other code, and a missing one, is a withdrawal
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => TransactionKind::Deposit,
            _ => TransactionKind::Withdrawal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Timestamps arrive as Unix seconds or as preformatted strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(i64),
    Text(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Unix(secs) => match chrono::DateTime::from_timestamp(*secs, 0) {
                Some(dt) => write!(f, "{}", dt.to_rfc3339()),
                None => write!(f, "{}", secs),
            },
            Timestamp::Text(text) => f.write_str(text),
        }
    }
}

/// Transaction record as returned by the history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(alias = "id")]
    pub transaction_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub transaction_type: Option<i64>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::from_code(self.transaction_type)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
}

/// `GET /api/history/transactions/{accountId}`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub data: TransactionList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_code() {
        assert_eq!(TransactionKind::from_code(Some(0)), TransactionKind::Deposit);
        assert_eq!(TransactionKind::from_code(Some(1)), TransactionKind::Withdrawal);
        assert_eq!(TransactionKind::from_code(Some(-3)), TransactionKind::Withdrawal);
        assert_eq!(TransactionKind::from_code(Some(i64::MAX)), TransactionKind::Withdrawal);
        assert_eq!(TransactionKind::from_code(None), TransactionKind::Withdrawal);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(TransactionKind::Deposit.label(), "Deposit");
        assert_eq!(TransactionKind::Withdrawal.to_string(), "Withdrawal");
    }

    #[test]
    fn test_history_response_preserves_order() {
        let response: HistoryResponse = serde_json::from_value(serde_json::json!({
            "status": "success",
            "data": {
                "transactions": [
                    {"transaction_id": "t3", "account_id": "a", "transaction_type": 1, "amount": 5.0, "timestamp": 1700000300},
                    {"transaction_id": "t1", "account_id": "a", "transaction_type": 0, "amount": 9.0, "timestamp": "yesterday"},
                    {"transaction_id": "t2", "account_id": "a", "amount": 1.0}
                ]
            }
        }))
        .unwrap();

        let ids: Vec<&str> = response
            .data
            .transactions
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(ids, vec!["t3", "t1", "t2"]);

        let t = &response.data.transactions;
        assert_eq!(t[0].timestamp, Some(Timestamp::Unix(1700000300)));
        assert_eq!(t[1].timestamp, Some(Timestamp::Text("yesterday".to_string())));
        assert_eq!(t[2].kind(), TransactionKind::Withdrawal);
    }

    #[test]
    fn test_unix_timestamp_display() {
        assert_eq!(Timestamp::Unix(0).to_string(), "1970-01-01T00:00:00+00:00");
    }
}
