use std::sync::Arc;

use super::ledger::AccountLedger;
use super::Ledger;
use crate::domain::calendar::Calendar;
use crate::domain::errors::LedgerError;
use crate::domain::models::{
    AccountId, AccountStore, AccountSummary, Amount, LedgerId, Transaction,
};
use crate::infrastructure::memory::InMemoryAccountStore;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait Application {
    async fn open_account(
        &self,
        seed: Amount,
        at: Option<DateTime<Utc>>,
    ) -> Result<AccountId, LedgerError>;
    async fn transfer(
        &self,
        origin: AccountId,
        destination: AccountId,
        amount: Amount,
        at: Option<DateTime<Utc>>,
    ) -> Result<Transaction, LedgerError>;
    async fn get_accounts(&self) -> Result<Vec<AccountSummary>, LedgerError>;
    async fn get_account(&self, id: AccountId) -> Result<AccountSummary, LedgerError>;
    /// Live balance when `at` is `None`, otherwise the balance at the end of
    /// the day containing `at`.
    async fn get_balance(
        &self,
        id: AccountId,
        at: Option<DateTime<Utc>>,
    ) -> Result<Amount, LedgerError>;
    async fn get_recent_transactions(
        &self,
        id: AccountId,
        k: usize,
    ) -> Result<Vec<Transaction>, LedgerError>;
    async fn get_top_counterparties(
        &self,
        id: AccountId,
        k: usize,
    ) -> Result<Vec<AccountId>, LedgerError>;
}

pub struct App<S> {
    store: Arc<S>,
    ledger: AccountLedger<S>,
}

impl App<InMemoryAccountStore> {
    pub fn new(calendar: Arc<dyn Calendar>, ledger_id: LedgerId) -> Self {
        Self::with_store(Arc::new(InMemoryAccountStore::default()), calendar, ledger_id)
    }
}

impl<S> App<S> {
    pub fn with_store(store: Arc<S>, calendar: Arc<dyn Calendar>, ledger_id: LedgerId) -> Self {
        let ledger = AccountLedger::builder()
            .store(store.clone())
            .calendar(calendar)
            .id(ledger_id)
            .build();
        Self { store, ledger }
    }
}

#[async_trait::async_trait]
impl<S> Application for App<S>
where
    S: AccountStore + Send + Sync + 'static,
{
    async fn open_account(
        &self,
        seed: Amount,
        at: Option<DateTime<Utc>>,
    ) -> Result<AccountId, LedgerError> {
        tracing::info!("Opening account with seed {} ...", seed);
        self.ledger.open_account(seed, at).await
    }

    async fn transfer(
        &self,
        origin: AccountId,
        destination: AccountId,
        amount: Amount,
        at: Option<DateTime<Utc>>,
    ) -> Result<Transaction, LedgerError> {
        tracing::info!("Submitting transfer {} -> {} of {}", origin, destination, amount);
        self.ledger.transfer(origin, destination, amount, at).await
    }

    async fn get_accounts(&self) -> Result<Vec<AccountSummary>, LedgerError> {
        tracing::info!("Getting all accounts ...");
        let mut summaries = Vec::new();
        for id in self.store.account_ids().await? {
            let account = self.store.get_account(id).await?;
            summaries.push(account.read().await.summary());
        }
        Ok(summaries)
    }

    async fn get_account(&self, id: AccountId) -> Result<AccountSummary, LedgerError> {
        tracing::info!("Getting account {}", id);
        let account = self.store.get_account(id).await?;
        let summary = account.read().await.summary();
        Ok(summary)
    }

    async fn get_balance(
        &self,
        id: AccountId,
        at: Option<DateTime<Utc>>,
    ) -> Result<Amount, LedgerError> {
        tracing::info!("Getting balance of account {} at {:?}", id, at);
        let account = self.store.get_account(id).await?;
        let account = account.read().await;
        match at {
            None => Ok(account.balance()),
            Some(at) if account.covers(at) => Ok(account.balance_as_of(at)),
            Some(at) => Err(LedgerError::BeforeAccountOpened { account: id, at }),
        }
    }

    async fn get_recent_transactions(
        &self,
        id: AccountId,
        k: usize,
    ) -> Result<Vec<Transaction>, LedgerError> {
        tracing::info!("Getting last {} transactions of account {}", k, id);
        let account = self.store.get_account(id).await?;
        let transactions = account.read().await.recent_transactions(k);
        Ok(transactions)
    }

    async fn get_top_counterparties(
        &self,
        id: AccountId,
        k: usize,
    ) -> Result<Vec<AccountId>, LedgerError> {
        tracing::info!("Getting top {} counterparties of account {}", k, id);
        let account = self.store.get_account(id).await?;
        let counterparties = account.read().await.top_counterparties(k);
        Ok(counterparties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{calendar::FixedOffsetCalendar, errors::StorageError};
    use chrono::TimeZone;
    use tokio_test::assert_ok;

    fn app() -> App<InMemoryAccountStore> {
        App::new(Arc::new(FixedOffsetCalendar::utc()), LedgerId::new(1))
    }

    fn day(d: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_walkthrough() {
        let app = app();
        let a = app.open_account(100, Some(day(1, 10))).await.unwrap();
        let b = app.open_account(0, Some(day(1, 11))).await.unwrap();
        let c = app.open_account(0, Some(day(1, 12))).await.unwrap();

        assert_eq!(assert_ok!(app.get_balance(a, None).await), 100);
        assert_eq!(assert_ok!(app.get_balance(a, Some(day(1, 23))).await), 100);

        app.transfer(a, b, 30, Some(day(3, 9))).await.unwrap();
        assert_eq!(app.get_balance(a, None).await.unwrap(), 70);
        assert_eq!(app.get_balance(a, Some(day(2, 12))).await.unwrap(), 100);
        assert_eq!(app.get_balance(a, Some(day(3, 0))).await.unwrap(), 70);
        assert_eq!(app.get_balance(a, Some(day(10, 0))).await.unwrap(), 70);

        app.transfer(a, b, 10, Some(day(3, 18))).await.unwrap();
        assert_eq!(app.get_top_counterparties(a, 1).await.unwrap(), vec![b]);

        app.transfer(a, c, 5, Some(day(4, 8))).await.unwrap();
        assert_eq!(app.get_top_counterparties(a, 2).await.unwrap(), vec![b, c]);

        let recent = app.get_recent_transactions(a, 2).await.unwrap();
        assert_eq!(recent[0].destination, c);
        assert_eq!(recent[1].amount, 10);

        assert_eq!(app.get_balance(b, None).await.unwrap(), 40);
        assert_eq!(app.get_balance(b, Some(day(2, 0))).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_balance_before_opening_is_an_error() {
        let app = app();
        let a = app.open_account(50, Some(day(5, 10))).await.unwrap();

        let result = app.get_balance(a, Some(day(4, 10))).await;
        assert!(matches!(
            result,
            Err(LedgerError::BeforeAccountOpened { account, .. }) if account == a
        ));
    }

    #[tokio::test]
    async fn test_accounts_listing_and_missing() {
        let app = app();
        let a = app.open_account(5, Some(day(1, 1))).await.unwrap();
        let b = app.open_account(7, Some(day(1, 2))).await.unwrap();

        let summaries = app.get_accounts().await.unwrap();
        assert_eq!(summaries.iter().map(|s| s.id).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(summaries[1].balance, 7);
        assert_eq!(app.get_account(a).await.unwrap().transaction_count, 1);

        assert!(matches!(
            app.get_account(AccountId::new(42)).await,
            Err(LedgerError::Storage(StorageError::AccountNotFound(_)))
        ));
        assert!(app.get_recent_transactions(a, 0).await.unwrap().is_empty());
    }
}
