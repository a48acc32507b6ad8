use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::Transaction;

/// Date-keyed spending, the only input the weekly aggregator reads.
///
/// Keys are kept sorted so the earliest and latest dates are cheap to find.
/// Transactions on the same day stay in insertion order. Refunds and credits
/// are refused at insertion and only counted, so every amount held here is
/// non-negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionStore {
    days: BTreeMap<NaiveDate, Vec<Transaction>>,
    skipped_refunds: usize,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction. Returns `false` (and stores nothing) for negative amounts.
    pub fn insert(&mut self, txn: Transaction) -> bool {
        if txn.is_refund() {
            self.skipped_refunds += 1;
            return false;
        }
        self.days.entry(txn.date).or_default().push(txn);
        true
    }

    pub fn on(&self, date: NaiveDate) -> &[Transaction] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of stored transactions.
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn skipped_refunds(&self) -> usize {
        self.skipped_refunds
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.days.values().flatten()
    }

    pub fn categories(&self) -> BTreeSet<String> {
        self.transactions().map(|t| t.category.clone()).collect()
    }

    pub fn merge(&mut self, other: &TransactionStore) {
        for (date, txns) in &other.days {
            self.days.entry(*date).or_default().extend(txns.iter().cloned());
        }
        self.skipped_refunds += other.skipped_refunds;
    }

    /// A copy of this store with every category passed through `relabel`.
    pub fn relabel<F>(&self, relabel: F) -> TransactionStore
    where
        F: Fn(&str) -> String,
    {
        let days = self
            .days
            .iter()
            .map(|(date, txns)| {
                let txns = txns
                    .iter()
                    .map(|t| Transaction {
                        category: relabel(&t.category),
                        ..t.clone()
                    })
                    .collect();
                (*date, txns)
            })
            .collect();
        TransactionStore {
            days,
            skipped_refunds: self.skipped_refunds,
        }
    }
}

impl FromIterator<Transaction> for TransactionStore {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        let mut store = TransactionStore::new();
        for txn in iter {
            store.insert(txn);
        }
        store
    }
}

impl Extend<Transaction> for TransactionStore {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        for txn in iter {
            self.insert(txn);
        }
    }
}
