use super::models::{AccountId, Amount};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Amount),
    #[error("Account {0} cannot transfer to itself")]
    SelfTransfer(AccountId),
    #[error("Account {0} is reserved for genesis transactions")]
    ReservedAccount(AccountId),
    #[error("Account {account} has balance {balance}, cannot send {amount}")]
    InsufficientFunds {
        account: AccountId,
        balance: Amount,
        amount: Amount,
    },
    #[error("Account {account} has balance {balance}, receiving {amount} would overflow")]
    BalanceOverflow {
        account: AccountId,
        balance: Amount,
        amount: Amount,
    },
    #[error("Transaction at {submitted} is outside the accepted window {earliest} to {latest}")]
    TimestampOutOfRange {
        submitted: DateTime<Utc>,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    },
    #[error("Transaction at {submitted} precedes last accepted transaction at {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        submitted: DateTime<Utc>,
    },
    #[error("Account {account} did not exist yet at {at}")]
    BeforeAccountOpened { account: AccountId, at: DateTime<Utc> },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StorageError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(AccountId),
}
