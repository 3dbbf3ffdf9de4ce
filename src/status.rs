//! Derived document status for deposit / ticket / voucher list views.
//!
//! Precedence is strict, first match wins:
//!
//! 1. an issued downstream document reference,
//! 2. paid in full,
//! 3. staged deposit covered,
//! 4. otherwise still waiting for the deposit.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BookingRecord;

/// Closed set of statuses a booking can be shown in.
///
/// This is the one vocabulary shared by status derivation and every list
/// filter; the snake_case key is what filters and exports carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    IssuedDocument,
    AwaitingFinalDocument,
    AwaitingFullPayment,
    AwaitingDeposit,
}

/// Badge colour hint for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Blue,
    Orange,
    Red,
}

impl StatusKind {
    pub const ALL: [StatusKind; 4] = [
        StatusKind::IssuedDocument,
        StatusKind::AwaitingFinalDocument,
        StatusKind::AwaitingFullPayment,
        StatusKind::AwaitingDeposit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::IssuedDocument => "issued_document",
            Self::AwaitingFinalDocument => "awaiting_final_document",
            Self::AwaitingFullPayment => "awaiting_full_payment",
            Self::AwaitingDeposit => "awaiting_deposit",
        }
    }

    /// Generic label; an issued document shows its reference instead.
    pub fn label(self) -> &'static str {
        match self {
            Self::IssuedDocument => "Document issued",
            Self::AwaitingFinalDocument => "Awaiting final document",
            Self::AwaitingFullPayment => "Awaiting full payment",
            Self::AwaitingDeposit => "Awaiting deposit",
        }
    }

    pub fn color(self) -> BadgeColor {
        match self {
            Self::IssuedDocument => BadgeColor::Green,
            Self::AwaitingFinalDocument => BadgeColor::Blue,
            Self::AwaitingFullPayment => BadgeColor::Orange,
            Self::AwaitingDeposit => BadgeColor::Red,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StatusKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| format!("unknown status: {s}"))
    }
}

impl fmt::Display for BadgeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::Red => "red",
        })
    }
}

/// Status derived from a booking record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DerivedStatus {
    /// Carries the trimmed reference, shown verbatim as the label.
    IssuedDocument { reference: String },
    AwaitingFinalDocument,
    AwaitingFullPayment,
    AwaitingDeposit,
}

impl DerivedStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::IssuedDocument { .. } => StatusKind::IssuedDocument,
            Self::AwaitingFinalDocument => StatusKind::AwaitingFinalDocument,
            Self::AwaitingFullPayment => StatusKind::AwaitingFullPayment,
            Self::AwaitingDeposit => StatusKind::AwaitingDeposit,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::IssuedDocument { reference } => reference,
            other => other.kind().label(),
        }
    }

    pub fn color(&self) -> BadgeColor {
        self.kind().color()
    }
}

/// Derive the display status of `record`. Total: every input maps to a status.
pub fn derive_status(record: &BookingRecord) -> DerivedStatus {
    if let Some(reference) = record
        .issued_document_reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
    {
        return DerivedStatus::IssuedDocument {
            reference: reference.to_owned(),
        };
    }

    let paid = record.total_paid();
    let grand_total = record.grand_total;
    let deposit = record.deposit_required;

    if paid > Decimal::ZERO && grand_total > Decimal::ZERO && paid >= grand_total {
        DerivedStatus::AwaitingFinalDocument
    } else if paid > Decimal::ZERO
        && deposit > Decimal::ZERO
        && paid >= deposit
        && paid < grand_total
    {
        DerivedStatus::AwaitingFullPayment
    } else {
        DerivedStatus::AwaitingDeposit
    }
}

/// List-view filter: everything, or one status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(StatusKind),
}

impl StatusFilter {
    pub fn matches(&self, status: &DerivedStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => status.kind() == *kind,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            key.parse().map(Self::Only)
        }
    }
}

/// Records whose derived status passes `filter`, in input order.
pub fn filter_by_status<'a>(
    records: &'a [BookingRecord],
    filter: StatusFilter,
) -> Vec<&'a BookingRecord> {
    records
        .iter()
        .filter(|r| filter.matches(&derive_status(r)))
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn booking(grand: Decimal, deposit: Decimal, paid: &[Decimal]) -> BookingRecord {
        paid.iter().fold(
            BookingRecord::new(grand, deposit, Decimal::ZERO),
            |rec, amt| rec.with_payment(*amt),
        )
    }

    #[test]
    fn issued_reference_wins_over_payments() {
        let rec = booking(dec!(100), dec!(50), &[dec!(100)]).with_issued_reference("  TK-0042 ");
        let status = derive_status(&rec);
        assert_eq!(
            status,
            DerivedStatus::IssuedDocument {
                reference: "TK-0042".into()
            }
        );
        assert_eq!(status.label(), "TK-0042");
        assert_eq!(status.color(), BadgeColor::Green);
    }

    #[test]
    fn blank_reference_is_ignored() {
        let rec = booking(dec!(100), dec!(50), &[]).with_issued_reference("   ");
        assert_eq!(derive_status(&rec), DerivedStatus::AwaitingDeposit);
    }

    #[test]
    fn deposit_threshold_is_inclusive() {
        let rec = booking(dec!(100), dec!(50), &[dec!(20), dec!(30)]);
        assert_eq!(derive_status(&rec), DerivedStatus::AwaitingFullPayment);
    }

    #[test]
    fn exact_grand_total_counts_as_paid() {
        let rec = booking(dec!(100), dec!(50), &[dec!(60), dec!(40)]);
        assert_eq!(derive_status(&rec), DerivedStatus::AwaitingFinalDocument);
    }

    #[test]
    fn zero_totals_stay_awaiting_deposit() {
        assert_eq!(
            derive_status(&BookingRecord::default()),
            DerivedStatus::AwaitingDeposit
        );
    }

    #[test]
    fn zero_deposit_skips_deposit_stage() {
        let partial = booking(dec!(100), dec!(0), &[dec!(40)]);
        assert_eq!(derive_status(&partial), DerivedStatus::AwaitingDeposit);

        let full = booking(dec!(100), dec!(0), &[dec!(100)]);
        assert_eq!(derive_status(&full), DerivedStatus::AwaitingFinalDocument);
    }

    #[test]
    fn huge_payment_totals_do_not_panic() {
        let rec = booking(Decimal::MAX, dec!(50), &[Decimal::MAX, Decimal::MAX]);
        assert_eq!(rec.total_paid(), Decimal::MAX);
        assert_eq!(derive_status(&rec), DerivedStatus::AwaitingFinalDocument);
    }

    #[test]
    fn below_deposit_is_awaiting_deposit() {
        let rec = booking(dec!(100), dec!(50), &[dec!(49.99)]);
        assert_eq!(derive_status(&rec), DerivedStatus::AwaitingDeposit);
    }

    #[test]
    fn keys_round_trip_through_from_str() {
        for kind in StatusKind::ALL {
            assert_eq!(kind.key().parse::<StatusKind>(), Ok(kind));
        }
        assert!("voucher_isued".parse::<StatusKind>().is_err());
    }

    #[test]
    fn filter_keeps_order_and_matches_kind() {
        let records = vec![
            booking(dec!(100), dec!(50), &[dec!(50)]),
            booking(dec!(100), dec!(50), &[]),
            booking(dec!(200), dec!(80), &[dec!(90)]),
        ];
        let filter: StatusFilter = "awaiting_full_payment".parse().unwrap();
        let hits = filter_by_status(&records, filter);
        assert_eq!(hits, vec![&records[0], &records[2]]);

        let all: StatusFilter = "all".parse().unwrap();
        assert_eq!(filter_by_status(&records, all).len(), 3);
    }
}
