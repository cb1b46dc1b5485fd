//! Domain services
//!
//! Stateless façades that turn one call into one REST round trip.

pub mod account;
pub mod auth;
pub mod bank;

pub use account::AccountService;
pub use auth::AuthService;
pub use bank::BankService;
