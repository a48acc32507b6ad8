//! Weekly spending aggregation over a [`TransactionStore`](crate::models::TransactionStore).

mod weekly;

pub(crate) use weekly::{analyze, WeeklyReport};
