use super::models::AccountId;
use std::collections::{BTreeMap, HashMap};

/// Ranks the counterparties an account has sent to by how many transfers
/// each received.
///
/// Counterparties are grouped into buckets keyed by send count. Promotion
/// moves an id from bucket `c` to bucket `c + 1` using swap-removal, so the
/// order of ids *within* a bucket is not stable and ties come back in an
/// unspecified order.
#[derive(Clone, Debug, Default)]
pub struct FrequencyRankIndex {
    buckets: BTreeMap<u64, Vec<AccountId>>,
    // counterparty -> current bucket key
    counts: HashMap<AccountId, u64>,
}

impl FrequencyRankIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more transfer sent to `counterparty`.
    pub fn promote(&mut self, counterparty: AccountId) {
        let count = match self.counts.get(&counterparty).copied() {
            Some(count) => {
                self.remove_from_bucket(count, counterparty);
                count + 1
            }
            None => 1,
        };
        self.buckets.entry(count).or_default().push(counterparty);
        self.counts.insert(counterparty, count);
    }

    fn remove_from_bucket(&mut self, count: u64, counterparty: AccountId) {
        let Some(bucket) = self.buckets.get_mut(&count) else {
            panic!("counterparty {counterparty} indexed at count {count} with no bucket");
        };
        if let Some(position) = bucket.iter().position(|id| *id == counterparty) {
            bucket.swap_remove(position);
        }
        if bucket.is_empty() {
            self.buckets.remove(&count);
        }
    }

    /// Up to `k` counterparties, highest send count first.
    pub fn top(&self, k: usize) -> Vec<AccountId> {
        self.buckets
            .values()
            .rev()
            .flat_map(|bucket| bucket.iter().copied())
            .take(k)
            .collect()
    }

    /// Transfers sent to `counterparty` so far.
    pub fn count_of(&self, counterparty: AccountId) -> u64 {
        self.counts.get(&counterparty).copied().unwrap_or_default()
    }

    /// Number of distinct counterparties ever sent to.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> AccountId {
        AccountId::new(n)
    }

    #[test]
    fn test_first_send_lands_in_bucket_one() {
        let mut index = FrequencyRankIndex::new();
        index.promote(id(2));

        assert_eq!(index.count_of(id(2)), 1);
        assert_eq!(index.top(5), vec![id(2)]);
    }

    #[test]
    fn test_promotion_reorders_ranking() {
        let mut index = FrequencyRankIndex::new();
        index.promote(id(2));
        index.promote(id(3));
        index.promote(id(3));

        assert_eq!(index.top(2), vec![id(3), id(2)]);

        index.promote(id(2));
        index.promote(id(2));

        assert_eq!(index.top(1), vec![id(2)]);
        assert_eq!(index.count_of(id(2)), 3);
        assert_eq!(index.count_of(id(3)), 2);
    }

    #[test]
    fn test_each_counterparty_in_one_bucket() {
        let mut index = FrequencyRankIndex::new();
        for n in [4, 5, 4, 6, 4, 5] {
            index.promote(id(n));
        }

        let members: usize = index.buckets.values().map(Vec::len).sum();
        assert_eq!(members, 3);
        assert_eq!(index.len(), 3);
        assert_eq!(index.buckets.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_top_zero_and_oversized() {
        let mut index = FrequencyRankIndex::new();
        index.promote(id(2));

        assert!(index.top(0).is_empty());
        assert_eq!(index.top(10).len(), 1);
        assert_eq!(index.count_of(id(9)), 0);
    }
}
