//! Bank service
//!
//! Deposits and withdrawals. Ordering and balance checks across
//! concurrent transfers are the backend's responsibility.

use crate::api::{ApiClient, ApiError};
use crate::models::transfer::{DepositRequest, TransferReceipt, WithdrawalRequest};

#[derive(Clone)]
pub struct BankService {
    client: ApiClient,
}

impl BankService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn deposit(&self, request: &DepositRequest) -> Result<TransferReceipt, ApiError> {
        let reply: serde_json::Value = self.client.post("/api/bank/deposit", request).await?;
        let receipt = TransferReceipt::from_value(&reply);

        tracing::info!(
            "Deposit of {} into {} accepted (transaction {:?})",
            request.amount,
            request.to_account_id,
            receipt.transaction_id
        );
        Ok(receipt)
    }

    pub async fn withdraw(&self, request: &WithdrawalRequest) -> Result<TransferReceipt, ApiError> {
        let reply: serde_json::Value = self.client.post("/api/bank/withdraw", request).await?;
        let receipt = TransferReceipt::from_value(&reply);

        tracing::info!(
            "Withdrawal of {} from {} accepted (transaction {:?})",
            request.amount,
            request.account_id,
            receipt.transaction_id
        );
        Ok(receipt)
    }
}
