use super::models::Transaction;

/// Append-only record of every transaction delivered to an account, in
/// delivery order.
#[derive(Clone, Debug, Default)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, transaction: Transaction) {
        self.entries.push(transaction);
    }

    /// Up to `k` entries, most recent first.
    pub fn recent(&self, k: usize) -> Vec<Transaction> {
        self.entries.iter().rev().take(k).cloned().collect()
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AccountId;
    use chrono::{Duration, TimeZone, Utc};

    fn log_of(n: i64) -> TransactionLog {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut log = TransactionLog::new();
        for i in 0..n {
            log.append(Transaction::new(
                AccountId::new(1),
                AccountId::new(2),
                i,
                start + Duration::minutes(i),
            ));
        }
        log
    }

    #[test]
    fn test_recent_is_newest_first() {
        let log = log_of(5);
        let amounts: Vec<_> = log.recent(3).iter().map(|t| t.amount).collect();

        assert_eq!(amounts, vec![4, 3, 2]);
    }

    #[test]
    fn test_recent_shorter_than_k() {
        let log = log_of(2);

        assert_eq!(log.recent(10).len(), 2);
        assert!(log.recent(0).is_empty());
    }
}
