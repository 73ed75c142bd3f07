use super::{
    balance::BalanceTracker,
    calendar::{Calendar, DayKey},
    daily_balance::DailyBalanceIndex,
    frequency::FrequencyRankIndex,
    models::{AccountId, AccountSummary, Amount, LedgerId, Transaction},
    transaction_log::TransactionLog,
};
use chrono::{DateTime, Utc};
use std::{fmt, sync::Arc};

/// Derived views over every transaction delivered to one account.
///
/// All views change only through [`Account::notify`]. The ledger must
/// deliver each transaction involving this account exactly once, in
/// non-decreasing timestamp order; delivering a transaction in which the
/// account is neither origin nor destination is undefined.
pub struct Account {
    id: AccountId,
    ledger: LedgerId,
    calendar: Arc<dyn Calendar>,
    balance: BalanceTracker,
    daily_balances: DailyBalanceIndex,
    recipients: FrequencyRankIndex,
    log: TransactionLog,
}

impl Account {
    pub fn new(id: AccountId, ledger: LedgerId, calendar: Arc<dyn Calendar>) -> Self {
        Self {
            id,
            ledger,
            calendar,
            balance: BalanceTracker::new(),
            daily_balances: DailyBalanceIndex::new(),
            recipients: FrequencyRankIndex::new(),
            log: TransactionLog::new(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn ledger(&self) -> LedgerId {
        self.ledger
    }

    /// Applies a transaction to every view.
    pub fn notify(&mut self, transaction: Transaction) {
        let counterparty = transaction.counterparty_of(self.id);
        let day = self.calendar.end_of_day(transaction.timestamp);

        self.balance.apply(self.id, &transaction);
        self.daily_balances
            .record(self.calendar.as_ref(), day, self.balance.current());
        if transaction.origin == self.id && !counterparty.is_genesis() {
            self.recipients.promote(counterparty);
        }

        tracing::debug!(
            "Account {} applied {} from {} to {} on {}, balance {}",
            self.id,
            transaction.amount,
            transaction.origin,
            transaction.destination,
            day,
            self.balance.current()
        );
        self.log.append(transaction);
    }

    pub fn balance(&self) -> Amount {
        self.balance.current()
    }

    /// Balance after `transaction` would be applied, or `None` on overflow.
    pub fn balance_after(&self, transaction: &Transaction) -> Option<Amount> {
        self.balance.projected(self.id, transaction)
    }

    /// Balance at the end of the day containing `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` falls on a day before the account's first transaction.
    pub fn balance_as_of(&self, at: DateTime<Utc>) -> Amount {
        let day = self.calendar.end_of_day(at);
        self.daily_balances.balance_as_of(day, self.balance.current())
    }

    /// Day of the first delivered transaction.
    pub fn opened_on(&self) -> Option<DayKey> {
        self.daily_balances.first_day()
    }

    /// Whether `at` falls on or after the account's first day.
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        match self.opened_on() {
            Some(first_day) => self.calendar.end_of_day(at) >= first_day,
            None => false,
        }
    }

    /// Up to `k` transactions, most recent first.
    pub fn recent_transactions(&self, k: usize) -> Vec<Transaction> {
        self.log.recent(k)
    }

    /// Up to `k` recipients ordered by descending send count. Order among
    /// recipients with equal counts is unspecified.
    pub fn top_counterparties(&self, k: usize) -> Vec<AccountId> {
        self.recipients.top(k)
    }

    /// Transfers this account has sent to `counterparty`.
    pub fn send_count(&self, counterparty: AccountId) -> u64 {
        self.recipients.count_of(counterparty)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.log.last().map(|t| t.timestamp)
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            ledger: self.ledger,
            balance: self.balance.current(),
            transaction_count: self.log.len(),
            distinct_counterparties: self.recipients.len(),
            opened_on: self.daily_balances.first_day(),
            last_active_on: self.daily_balances.last_day(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("ledger", &self.ledger)
            .field("balance", &self.balance.current())
            .field("transactions", &self.log.len())
            .finish()
    }
}
