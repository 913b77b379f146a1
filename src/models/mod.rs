pub mod line;
pub mod order;
pub mod settlement;
pub mod status;
pub mod tracking;

pub use line::{LineDate, PurchaseLine, RawRow, UNKNOWN_DATE};
pub use order::PurchaseOrder;
pub use settlement::{SettlementEntry, SettlementStatus, SettlementSummary};
pub use status::OrderStatus;
pub use tracking::TrackingEvent;
