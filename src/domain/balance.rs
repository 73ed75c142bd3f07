use super::models::{AccountId, Amount, Transaction};

/// Live running balance of a single account.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalanceTracker {
    balance: Amount,
}

impl BalanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance `owner` would hold after `transaction`, or `None` if it would
    /// leave the [`Amount`] range.
    pub fn projected(&self, owner: AccountId, transaction: &Transaction) -> Option<Amount> {
        if transaction.origin == owner {
            self.balance.checked_sub(transaction.amount)
        } else if transaction.destination == owner {
            self.balance.checked_add(transaction.amount)
        } else {
            Some(self.balance)
        }
    }

    /// Debits `owner` when it sent `transaction`, credits it when it received it.
    /// `owner` must be one of the two parties.
    ///
    /// # Panics
    ///
    /// Panics if the new balance leaves the [`Amount`] range. Callers check
    /// [`BalanceTracker::projected`] first.
    pub fn apply(&mut self, owner: AccountId, transaction: &Transaction) {
        match self.projected(owner, transaction) {
            Some(balance) => self.balance = balance,
            None => panic!(
                "balance of {owner} overflows applying {} from {} to {}",
                transaction.amount, transaction.origin, transaction.destination
            ),
        }
    }

    pub fn current(&self) -> Amount {
        self.balance
    }
}
