//! Account data types
//!
//! Wire types for the `/api/account` endpoints. The gateway is not
//! consistent about field names or envelopes, so deserialization is
//! lenient and the service layer checks what actually matters.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Account kind offered by the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub const ALL: [AccountType; 2] = [AccountType::Checking, AccountType::Savings];

    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
        }
    }

    /// Backend enum code (0 = Checking, 1 = Savings)
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(AccountType::Checking),
            1 => Some(AccountType::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown account type: {0}. Use 'Checking' or 'Savings'")]
pub struct UnknownAccountType(pub String);

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            _ => Err(UnknownAccountType(s.to_string())),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AccountTypeRepr {
    Code(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for AccountType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match AccountTypeRepr::deserialize(deserializer)? {
            AccountTypeRepr::Code(code) => AccountType::from_code(code)
                .ok_or_else(|| de::Error::custom(format!("unknown account type code: {}", code))),
            AccountTypeRepr::Name(name) => name.parse().map_err(de::Error::custom),
        }
    }
}

/// Account as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(alias = "id")]
    pub account_id: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default, deserialize_with = "lenient_account_type")]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Account {
    /// An account without an identifier cannot be addressed by any endpoint
    pub fn is_identified(&self) -> bool {
        !self.account_id.trim().is_empty()
    }

    /// Name shown in pickers; falls back to the identifier
    pub fn display_name(&self) -> &str {
        if self.account_name.is_empty() {
            &self.account_id
        } else {
            &self.account_name
        }
    }

    /// Overlay a refreshed copy of the same account
    ///
    /// Single-account replies omit the name and sometimes the type; those
    /// keep the value already known.
    pub fn refresh_from(&mut self, fresh: Account) {
        if !fresh.account_name.is_empty() {
            self.account_name = fresh.account_name;
        }
        if fresh.account_type.is_some() {
            self.account_type = fresh.account_type;
        }
        if fresh.user_id.is_some() {
            self.user_id = fresh.user_id;
        }
        self.balance = fresh.balance;
    }
}

/// Unknown type codes decode as `None` instead of failing the whole reply
fn lenient_account_type<'de, D>(deserializer: D) -> Result<Option<AccountType>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match AccountType::deserialize(&value) {
        Ok(account_type) => Ok(Some(account_type)),
        Err(e) => {
            tracing::warn!("Ignoring account type {}: {}", value, e);
            Ok(None)
        }
    }
}

/// `GET /api/account/accounts`
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountHolder {
    pub account: Account,
}

/// Single-account replies come bare or wrapped depending on the endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountEnvelope {
    Data { data: AccountHolder },
    Wrapped { account: Account },
    Bare(Account),
}

impl AccountEnvelope {
    pub fn into_account(self) -> Account {
        match self {
            AccountEnvelope::Data { data } => data.account,
            AccountEnvelope::Wrapped { account } => account,
            AccountEnvelope::Bare(account) => account,
        }
    }
}

/// `POST /api/account/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub account_type: AccountType,
    pub account_name: String,
}

/// `PUT /api/account/update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub account_id: String,
    pub account_name: String,
    pub balance: f64,
}
