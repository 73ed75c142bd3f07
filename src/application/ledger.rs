use super::Ledger;
use crate::domain::{
    account::Account,
    calendar::Calendar,
    errors::LedgerError,
    models::{AccountId, AccountStore, Amount, LedgerId, Transaction},
};
use chrono::{DateTime, Duration, Utc};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::Mutex;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct AccountLedger<S> {
    store: Arc<S>,
    calendar: Arc<dyn Calendar>,
    #[builder(default = LedgerId::new(1))]
    id: LedgerId,
    /// Earliest timestamp the ledger accepts
    #[builder(default = DateTime::UNIX_EPOCH)]
    epoch: DateTime<Utc>,
    /// How far ahead of the local clock a timestamp may be
    #[builder(default = Duration::minutes(5))]
    max_clock_skew: Duration,
    // highest id issued so far; 0 is the genesis sentinel
    #[builder(default, setter(skip))]
    issued: AtomicU64,
    // held for a whole submission so deliveries reach accounts in timestamp order
    #[builder(default, setter(skip))]
    last_accepted: Mutex<Option<DateTime<Utc>>>,
}

impl<S> AccountLedger<S> {
    pub fn id(&self) -> LedgerId {
        self.id
    }

    /// Resolves the timestamp of a new submission. It must not precede the
    /// last accepted one and must fall between the epoch and the local clock
    /// plus the allowed skew, which bounds the days any account gap-fills.
    fn admit(
        &self,
        last: Option<DateTime<Utc>>,
        at: Option<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>, LedgerError> {
        let now = Utc::now();
        let at = at.unwrap_or_else(|| last.map_or(now, |last| last.max(now)));
        let latest = now + self.max_clock_skew;
        if at < self.epoch || at > latest {
            tracing::warn!(
                "Rejected transaction at {}, accepted window {} to {}",
                at,
                self.epoch,
                latest
            );
            return Err(LedgerError::TimestampOutOfRange {
                submitted: at,
                earliest: self.epoch,
                latest,
            });
        }
        match last {
            Some(last) if at < last => {
                tracing::warn!("Rejected transaction at {}, last accepted at {}", at, last);
                Err(LedgerError::OutOfOrder {
                    last,
                    submitted: at,
                })
            }
            _ => Ok(at),
        }
    }
}

#[async_trait::async_trait]
impl<S> Ledger for AccountLedger<S>
where
    S: AccountStore + Send + Sync + 'static,
{
    async fn open_account(
        &self,
        seed: Amount,
        at: Option<DateTime<Utc>>,
    ) -> Result<AccountId, LedgerError> {
        if seed < 0 {
            return Err(LedgerError::InvalidAmount(seed));
        }
        let mut last_accepted = self.last_accepted.lock().await;
        let at = self.admit(*last_accepted, at)?;

        let id = AccountId::new(self.issued.fetch_add(1, Ordering::SeqCst) + 1);
        let mut account = Account::new(id, self.id, self.calendar.clone());
        account.notify(Transaction::genesis(id, seed, at));
        self.store.insert_account(account).await?;

        *last_accepted = Some(at);
        tracing::info!("Opened account {} on ledger {} with {}", id, self.id, seed);
        Ok(id)
    }

    async fn transfer(
        &self,
        origin: AccountId,
        destination: AccountId,
        amount: Amount,
        at: Option<DateTime<Utc>>,
    ) -> Result<Transaction, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if origin == destination {
            return Err(LedgerError::SelfTransfer(origin));
        }
        if let Some(reserved) = [origin, destination].into_iter().find(AccountId::is_genesis) {
            return Err(LedgerError::ReservedAccount(reserved));
        }

        let mut last_accepted = self.last_accepted.lock().await;
        let at = self.admit(*last_accepted, at)?;
        let sender = self.store.get_account(origin).await?;
        let receiver = self.store.get_account(destination).await?;
        let transaction = Transaction::new(origin, destination, amount, at);

        // both parties are checked before either is touched; the ledger lock
        // keeps writers serialized, so holding two write locks cannot deadlock
        let mut sender = sender.write().await;
        let mut receiver = receiver.write().await;
        let balance = sender.balance();
        if balance < amount {
            tracing::warn!(
                "Rejected transfer of {} from {} to {}: balance {}",
                amount,
                origin,
                destination,
                balance
            );
            return Err(LedgerError::InsufficientFunds {
                account: origin,
                balance,
                amount,
            });
        }
        if receiver.balance_after(&transaction).is_none() {
            let balance = receiver.balance();
            tracing::warn!(
                "Rejected transfer of {} from {} to {}: receiver balance {} would overflow",
                amount,
                origin,
                destination,
                balance
            );
            return Err(LedgerError::BalanceOverflow {
                account: destination,
                balance,
                amount,
            });
        }
        sender.notify(transaction.clone());
        receiver.notify(transaction.clone());

        *last_accepted = Some(at);
        tracing::info!("Transferred {} from {} to {}", amount, origin, destination);
        Ok(transaction)
    }
}
