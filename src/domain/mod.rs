pub mod account;
pub mod balance;
pub mod calendar;
pub mod daily_balance;
pub mod errors;
pub mod frequency;
pub mod models;
pub mod transaction_log;
