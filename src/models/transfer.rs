//! Deposit and withdrawal request types
//!
//! Built per submission by the transfer views and discarded afterwards.

use serde::{Deserialize, Serialize};

/// `POST /api/bank/deposit`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: f64,
    pub is_bank_agent: bool,
}

/// `POST /api/bank/withdraw`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub account_id: String,
    pub amount: f64,
}

/// Common surface the transfer flow needs from a pending request
pub trait TransferRequest: Clone + Default {
    /// Account the money is taken from (or credited, for withdrawals)
    fn source_account(&self) -> &str;
    fn set_source_account(&mut self, account_id: String);
    fn amount(&self) -> f64;
    fn set_amount(&mut self, amount: f64);
}

impl TransferRequest for DepositRequest {
    fn source_account(&self) -> &str {
        &self.from_account_id
    }

    fn set_source_account(&mut self, account_id: String) {
        self.from_account_id = account_id;
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
    }
}

impl TransferRequest for WithdrawalRequest {
    fn source_account(&self) -> &str {
        &self.account_id
    }

    fn set_source_account(&mut self, account_id: String) {
        self.account_id = account_id;
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
    }
}

/// Backend reply to a deposit or withdrawal
///
/// The deposit endpoint nests the id under `data`, the withdrawal
/// endpoint puts it at the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub transaction_id: Option<String>,
}

impl TransferReceipt {
    pub fn from_value(value: &serde_json::Value) -> Self {
        let transaction_id = value
            .get("data")
            .and_then(|d| d.get("transaction_id"))
            .or_else(|| value.get("transaction_id"))
            .and_then(|id| id.as_str())
            .map(|id| id.to_string());

        Self { transaction_id }
    }
}
