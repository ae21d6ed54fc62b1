mod aggregate;
mod error;
mod ledger;
mod meal;
mod store;

pub use aggregate::{day_key, last_n_days, range_totals, totals_for_day, DayTotals};
pub use error::LedgerError;
pub use ledger::Ledger;
pub use meal::{Meal, MealDraft};
pub use store::{FileLedgerStore, LedgerStore, MemoryLedgerStore};
