use super::{
    calendar::{Calendar, DayKey},
    models::Amount,
};
use std::collections::BTreeMap;

/// End-of-day balances, one entry per calendar day from the account's first
/// transaction through its latest one, with no gaps.
#[derive(Clone, Debug, Default)]
pub struct DailyBalanceIndex {
    days: BTreeMap<DayKey, Amount>,
}

impl DailyBalanceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `balance` as the end-of-day balance for `day`.
    ///
    /// Days between the last recorded day and `day` are filled with the last
    /// recorded balance, since nothing changed on them. `day` must not
    /// precede the last recorded day.
    pub fn record<C>(&mut self, calendar: &C, day: DayKey, balance: Amount)
    where
        C: Calendar + ?Sized,
    {
        if let Some((&last_day, &last_balance)) = self.days.last_key_value() {
            debug_assert!(
                last_day <= day,
                "day {day} recorded after later day {last_day}"
            );
            let mut cursor = calendar.next_day(last_day);
            while let Some(gap_day) = cursor.filter(|d| *d < day) {
                self.days.insert(gap_day, last_balance);
                cursor = calendar.next_day(gap_day);
            }
        }
        self.days.insert(day, balance);
    }

    /// Balance at the end of `day`.
    ///
    /// Days after the last recorded one resolve to `live_balance`.
    ///
    /// # Panics
    ///
    /// Panics if `day` precedes the first recorded day, or if a day inside
    /// the recorded range is missing.
    pub fn balance_as_of(&self, day: DayKey, live_balance: Amount) -> Amount {
        let Some((&last_day, _)) = self.days.last_key_value() else {
            return live_balance;
        };
        if day > last_day {
            return live_balance;
        }
        if let Some(first_day) = self.first_day() {
            assert!(
                day >= first_day,
                "balance requested for {day}, before the account opened on {first_day}"
            );
        }
        match self.days.get(&day) {
            Some(balance) => *balance,
            None => panic!("daily balance index has no entry for {day} inside its range"),
        }
    }

    pub fn first_day(&self) -> Option<DayKey> {
        self.days.first_key_value().map(|(day, _)| *day)
    }

    pub fn last_day(&self) -> Option<DayKey> {
        self.days.last_key_value().map(|(day, _)| *day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Recorded days and balances in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (DayKey, Amount)> + '_ {
        self.days.iter().map(|(day, balance)| (*day, *balance))
    }
}
