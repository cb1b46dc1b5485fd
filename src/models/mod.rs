//! Data models module
//!
//! Contains all data structures exchanged with the bank API:
//! - Session record
//! - Account and transaction types
//! - Deposit/withdrawal requests
//! - Authentication payloads

pub mod account;
pub mod session;
pub mod transaction;
pub mod transfer;
pub mod user;
