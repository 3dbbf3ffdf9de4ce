//! Public API for the booking status crate: derived document status for
//! deposit / ticket / voucher lists, and selection-based pricing for
//! receipts and invoices.

pub mod board;
pub mod errors;
pub mod models;
pub mod numeric;
pub mod pricing;
pub mod status;

pub use errors::SubmissionError;
pub use models::{BookingRecord, FareClass, PriceBreakdown, SelectableLineItemSet};
pub use pricing::{aggregate, validate_for_submission};
pub use status::{DerivedStatus, StatusFilter, StatusKind, derive_status};
