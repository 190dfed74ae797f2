pub use crate::errors::LedgerError;
pub use crate::memory::InMemoryLedgerStore;
pub use crate::model::{Balance, EntryKind, LedgerEntry, ReferenceId};
pub use crate::store::{AppendOutcome, LedgerStore};
