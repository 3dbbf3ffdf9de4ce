//! Status board: feed flat booking and payment rows one at a time, then read
//! back every booking's derived status.
//!
//! Rows look like what a deposit list view receives from the gateway: money
//! columns may be blank, and payments reference their booking by id.

use crate::models::{BookingRecord, Payment};
use crate::numeric::or_zero;
use crate::status::{DerivedStatus, StatusFilter, derive_status};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One booking / deposit row. Blank money cells read as zero.
#[derive(Debug, Deserialize)]
pub struct BookingRow {
    pub booking: String,
    #[serde(default)]
    pub grand_total: Option<Decimal>,
    #[serde(default)]
    pub deposit_total_1: Option<Decimal>,
    #[serde(default)]
    pub deposit_total_2: Option<Decimal>,
    #[serde(default)]
    pub issued_reference: Option<String>,
}

/// One recorded payment against a booking id.
#[derive(Debug, Deserialize)]
pub struct PaymentRow {
    pub booking: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// Why a row was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    DuplicateBooking,
    UnknownBooking,
    NegativeAmount,
}

/// A booking id with its derived status, ready for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub booking: String,
    pub status: DerivedStatus,
    pub total_paid: Decimal,
}

/// In-memory board.
///
/// ```rust
/// # use booking_status::board::{BookingRow, StatusBoard};
/// # use booking_status::status::StatusFilter;
/// let mut board = StatusBoard::new();
/// board.add_booking(BookingRow {
///     booking: "BK-1".into(),
///     grand_total: None,
///     deposit_total_1: None,
///     deposit_total_2: None,
///     issued_reference: None,
/// }).unwrap();
/// assert_eq!(board.statuses(StatusFilter::All).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StatusBoard {
    /// Map of booking id ➜ assembled record.
    bookings: HashMap<String, BookingRecord>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    /// Register a booking. The first row for an id wins.
    pub fn add_booking(&mut self, row: BookingRow) -> Result<(), Rejection> {
        let id = row.booking.trim().to_owned();
        if self.bookings.contains_key(&id) {
            warn!(booking = %id, "duplicate booking row ignored");
            return Err(Rejection::DuplicateBooking);
        }

        let mut record = BookingRecord::new(
            or_zero(row.grand_total),
            or_zero(row.deposit_total_1),
            or_zero(row.deposit_total_2),
        );
        record.issued_document_reference = row.issued_reference;
        debug!(booking = %id, "booking registered");
        self.bookings.insert(id, record);
        Ok(())
    }

    /// Record a payment against a registered booking.
    pub fn add_payment(&mut self, row: PaymentRow) -> Result<(), Rejection> {
        let id = row.booking.trim();
        let amount = or_zero(row.amount);
        if amount < Decimal::ZERO {
            warn!(booking = %id, %amount, "negative payment rejected");
            return Err(Rejection::NegativeAmount);
        }
        let Some(record) = self.bookings.get_mut(id) else {
            warn!(booking = %id, %amount, "payment for unknown booking rejected");
            return Err(Rejection::UnknownBooking);
        };
        record.payments_received.push(Payment { amount });
        Ok(())
    }

    pub fn record(&self, booking: &str) -> Option<&BookingRecord> {
        self.bookings.get(booking.trim())
    }

    /// Derived status of every booking passing `filter`, sorted by id.
    pub fn statuses(&self, filter: StatusFilter) -> Vec<StatusLine> {
        let mut lines: Vec<_> = self
            .bookings
            .iter()
            .map(|(id, rec)| StatusLine {
                booking: id.clone(),
                status: derive_status(rec),
                total_paid: rec.total_paid(),
            })
            .filter(|line| filter.matches(&line.status))
            .collect();
        lines.sort_by(|a, b| a.booking.cmp(&b.booking));
        lines
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusKind;
    use rust_decimal_macros::dec;

    fn booking(id: &str, grand: Decimal, d1: Decimal, d2: Decimal) -> BookingRow {
        BookingRow {
            booking: id.into(),
            grand_total: Some(grand),
            deposit_total_1: Some(d1),
            deposit_total_2: Some(d2),
            issued_reference: None,
        }
    }

    fn pay(id: &str, amount: Decimal) -> PaymentRow {
        PaymentRow {
            booking: id.into(),
            amount: Some(amount),
        }
    }

    #[test]
    fn payments_accumulate_into_status() {
        let mut board = StatusBoard::new();
        board.add_booking(booking("B1", dec!(1000), dec!(300), dec!(200))).unwrap();
        board.add_payment(pay("B1", dec!(250))).unwrap();
        board.add_payment(pay("B1", dec!(250))).unwrap();

        let lines = board.statuses(StatusFilter::All);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].status, DerivedStatus::AwaitingFullPayment);
        assert_eq!(lines[0].total_paid, dec!(500));
    }

    #[test]
    fn duplicate_booking_is_ignored() {
        let mut board = StatusBoard::new();
        board.add_booking(booking("B1", dec!(100), dec!(0), dec!(0))).unwrap();
        assert_eq!(
            board.add_booking(booking("B1", dec!(999), dec!(0), dec!(0))),
            Err(Rejection::DuplicateBooking)
        );
        assert_eq!(board.record("B1").unwrap().grand_total, dec!(100));
    }

    #[test]
    fn bad_payments_are_rejected() {
        let mut board = StatusBoard::new();
        board.add_booking(booking("B1", dec!(100), dec!(50), dec!(0))).unwrap();
        assert_eq!(
            board.add_payment(pay("NOPE", dec!(10))),
            Err(Rejection::UnknownBooking)
        );
        assert_eq!(
            board.add_payment(pay("B1", dec!(-10))),
            Err(Rejection::NegativeAmount)
        );
        assert_eq!(board.record("B1").unwrap().total_paid(), Decimal::ZERO);
    }

    #[test]
    fn ids_are_trimmed_on_every_lookup() {
        let mut board = StatusBoard::new();
        board.add_booking(booking(" B1 ", dec!(100), dec!(50), dec!(0))).unwrap();
        board.add_payment(pay("B1  ", dec!(60))).unwrap();

        assert_eq!(board.record(" B1 ").unwrap().total_paid(), dec!(60));
        assert_eq!(board.record("B1").unwrap().total_paid(), dec!(60));
        assert_eq!(
            board.add_booking(booking("B1", dec!(1), dec!(0), dec!(0))),
            Err(Rejection::DuplicateBooking)
        );
    }

    #[test]
    fn blank_cells_read_as_zero() {
        let mut board = StatusBoard::new();
        board
            .add_booking(BookingRow {
                booking: "B1".into(),
                grand_total: None,
                deposit_total_1: None,
                deposit_total_2: None,
                issued_reference: None,
            })
            .unwrap();
        let lines = board.statuses(StatusFilter::All);
        assert_eq!(lines[0].status, DerivedStatus::AwaitingDeposit);
    }

    #[test]
    fn statuses_are_sorted_and_filtered() {
        let mut board = StatusBoard::new();
        board.add_booking(booking("B2", dec!(100), dec!(50), dec!(0))).unwrap();
        board.add_booking(booking("B1", dec!(100), dec!(50), dec!(0))).unwrap();
        let mut issued = booking("B3", dec!(100), dec!(50), dec!(0));
        issued.issued_reference = Some("VC-7".into());
        board.add_booking(issued).unwrap();
        board.add_payment(pay("B2", dec!(100))).unwrap();

        let ids: Vec<_> = board
            .statuses(StatusFilter::All)
            .into_iter()
            .map(|l| l.booking)
            .collect();
        assert_eq!(ids, ["B1", "B2", "B3"]);

        let done = board.statuses(StatusFilter::Only(StatusKind::AwaitingFinalDocument));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].booking, "B2");
    }
}
