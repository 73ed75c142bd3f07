use crate::domain::{
    errors::LedgerError,
    models::{AccountId, Amount, Transaction},
};
use chrono::{DateTime, Utc};

pub mod app;
pub mod ledger;
/// The `Ledger` trait defines how transactions enter the system.
///
/// Implementors issue account ids, accept or reject transfers, and deliver
/// every accepted transaction exactly once to each account it involves, in
/// non-decreasing timestamp order. Opening an account delivers a genesis
/// transaction that seeds its balance.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), wallet_views::domain::errors::LedgerError> {
/// use std::sync::Arc;
/// use wallet_views::application::{ledger::AccountLedger, Ledger};
/// use wallet_views::domain::calendar::FixedOffsetCalendar;
/// use wallet_views::infrastructure::memory::InMemoryAccountStore;
///
/// let ledger = AccountLedger::builder()
///     .store(Arc::new(InMemoryAccountStore::default()))
///     .calendar(Arc::new(FixedOffsetCalendar::utc()))
///     .build();
/// let alice = ledger.open_account(100, None).await?;
/// let bob = ledger.open_account(0, None).await?;
/// ledger.transfer(alice, bob, 30, None).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Rejected operations return a [`LedgerError`]; nothing is delivered to
/// any account in that case.
#[async_trait::async_trait]
pub trait Ledger {
    /// Opens a new account credited with `seed`. `at` defaults to now.
    async fn open_account(
        &self,
        seed: Amount,
        at: Option<DateTime<Utc>>,
    ) -> Result<AccountId, LedgerError>;

    /// Moves `amount` from `origin` to `destination`. `at` defaults to now.
    async fn transfer(
        &self,
        origin: AccountId,
        destination: AccountId,
        amount: Amount,
        at: Option<DateTime<Utc>>,
    ) -> Result<Transaction, LedgerError>;
}
