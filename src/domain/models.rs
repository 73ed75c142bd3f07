use super::{account::Account, calendar::DayKey, errors::StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tokio::sync::RwLock;

/// Signed monetary amount. Balances may be read as negative only if a
/// caller bypasses the ledger's funds check.
pub type Amount = i64;

/// Identifier of an account within a ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u64);

impl AccountId {
    /// Reserved sentinel used as the origin of genesis transactions.
    pub const GENESIS: Self = Self(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_genesis(&self) -> bool {
        *self == Self::GENESIS
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the ledger an account was opened on. Accounts only carry it
/// for lookup; they never reach back into the ledger through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerId(u32);

impl LedgerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable transfer recorded on the ledger.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Sending account, or [`AccountId::GENESIS`] for a seed credit
    pub origin: AccountId,
    /// Receiving account
    pub destination: AccountId,
    /// Amount transferred
    pub amount: Amount,
    /// Instant the ledger accepted the transaction
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        origin: AccountId,
        destination: AccountId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            origin,
            destination,
            amount,
            timestamp,
        }
    }

    /// Builds the seed transaction that credits a freshly opened account.
    pub fn genesis(destination: AccountId, amount: Amount, timestamp: DateTime<Utc>) -> Self {
        Self::new(AccountId::GENESIS, destination, amount, timestamp)
    }

    pub fn is_genesis(&self) -> bool {
        self.origin.is_genesis()
    }

    /// The party on the other side of the transaction from `account`.
    /// Returns the genesis sentinel when `account` receives a seed credit.
    pub fn counterparty_of(&self, account: AccountId) -> AccountId {
        if self.origin == account {
            self.destination
        } else {
            self.origin
        }
    }
}

/// Point-in-time overview of an account's views.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub ledger: LedgerId,
    pub balance: Amount,
    pub transaction_count: usize,
    pub distinct_counterparties: usize,
    /// Day of the genesis transaction
    pub opened_on: Option<DayKey>,
    /// Day of the most recent transaction
    pub last_active_on: Option<DayKey>,
}

/// An account guarded by its own lock. Writers hold it for a whole delivery
/// so readers never observe a partially applied transaction.
pub type SharedAccount = Arc<RwLock<Account>>;

/// Trait for account storage operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AccountStore {
    /// Stores a newly created account and returns its shared handle.
    async fn insert_account(&self, account: Account) -> Result<SharedAccount, StorageError>;

    /// Retrieves the shared handle of an account by id.
    async fn get_account(&self, id: AccountId) -> Result<SharedAccount, StorageError>;

    /// Retrieves the ids of every stored account in ascending order.
    async fn account_ids(&self) -> Result<Vec<AccountId>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_counterparty_of_both_sides() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let tx = Transaction::new(AccountId::new(1), AccountId::new(2), 10, at);

        assert_eq!(tx.counterparty_of(AccountId::new(1)), AccountId::new(2));
        assert_eq!(tx.counterparty_of(AccountId::new(2)), AccountId::new(1));
        assert!(!tx.is_genesis());
    }

    #[test]
    fn test_genesis_counterparty_is_sentinel() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let tx = Transaction::genesis(AccountId::new(7), 100, at);

        assert!(tx.is_genesis());
        assert!(tx.counterparty_of(AccountId::new(7)).is_genesis());
    }
}
