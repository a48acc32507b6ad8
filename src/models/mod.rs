mod budget;
mod import_rule;
mod store;
mod transaction;

pub use budget::BudgetLine;
pub use import_rule::CategoryRule;
pub use store::TransactionStore;
pub use transaction::{Transaction, UNCATEGORIZED};
