pub mod aggregator;
pub mod ledger;
pub mod lifecycle;
pub mod normalizer;
pub mod store;
pub mod timeline;

pub use aggregator::{aggregate, Aggregation, GroupingPolicy};
pub use ledger::SettlementLedger;
pub use lifecycle::{apply_transition, can_transition, TransitionRequest};
pub use normalizer::{parse_date, RowNormalizer};
pub use store::{AutoConfirm, Clock, Confirmation, FixedClock, ProcurementStore, RefreshSummary, SystemClock};
pub use timeline::{derive_timeline, timeline, TimelineMode, TransitionLog};
