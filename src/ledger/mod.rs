//! Ledger domain models, derivation, and range helpers.

pub mod derivation;
pub mod entry;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod range;
pub mod summary;

pub use derivation::derive_entries;
pub use entry::{DerivedEntry, RawEntry, DATE_FORMAT};
pub use ledger::{Ledger, LedgerState, UpsertOutcome};
pub use range::{filter_by_range, RangeSelection, PRESET_RANGES};
pub use summary::{summarize, LedgerSummary};
