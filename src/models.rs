//! Common domain types: booking records with their payments, and the
//! selectable passenger/extra sets a billing document is priced from.
//!
//! Inputs arrive from the gateway as loosely-typed JSON, so every numeric
//! field defaults to zero and every string to empty / `None`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::numeric::sum_amounts;

/// Reads an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One recorded payment against a booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Decimal,
}

/// The read-only view of a deposit / ticket / voucher row that status
/// derivation needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Total owed once fully processed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub grand_total: Decimal,
    /// Sum of the staged deposits (`deposit_total_1 + deposit_total_2`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub deposit_required: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payments_received: Vec<Payment>,
    /// Set once the downstream document (ticket, voucher, …) exists.
    #[serde(default)]
    pub issued_document_reference: Option<String>,
}

impl BookingRecord {
    /// Record with no payments yet; the two staged deposits are summed.
    pub fn new(grand_total: Decimal, deposit_total_1: Decimal, deposit_total_2: Decimal) -> Self {
        Self {
            grand_total,
            deposit_required: deposit_total_1.saturating_add(deposit_total_2),
            payments_received: Vec::new(),
            issued_document_reference: None,
        }
    }

    pub fn with_payment(mut self, amount: Decimal) -> Self {
        self.payments_received.push(Payment { amount });
        self
    }

    pub fn with_issued_reference(mut self, reference: impl Into<String>) -> Self {
        self.issued_document_reference = Some(reference.into());
        self
    }

    /// Sum of every recorded payment, in any order.
    pub fn total_paid(&self) -> Decimal {
        sum_amounts(self.payments_received.iter().map(|p| p.amount))
    }
}

/// Fare bucket a passenger is priced in.
///
/// Deserializes either from a tier name (`"tier2"`) or from the raw
/// age/category code the booking carries (`"CHD"`, `"INF"`, …). `null`
/// prices as `Tier1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", rename_all = "lowercase")]
pub enum FareClass {
    #[default]
    Tier1,
    Tier2,
    Tier3,
}

impl FareClass {
    /// Map a raw category code. Unknown codes price as `Tier1`.
    pub fn from_category(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADT2" | "CHD" | "CHILD" => Self::Tier2,
            "ADT3" | "INF" | "INFANT" => Self::Tier3,
            _ => Self::Tier1,
        }
    }
}

impl From<Option<String>> for FareClass {
    fn from(raw: Option<String>) -> Self {
        let raw = raw.unwrap_or_default();
        match raw.trim().to_ascii_lowercase().as_str() {
            "tier1" => Self::Tier1,
            "tier2" => Self::Tier2,
            "tier3" => Self::Tier3,
            _ => Self::from_category(&raw),
        }
    }
}

/// One value per fare tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTier<T> {
    pub tier1: T,
    pub tier2: T,
    pub tier3: T,
}

impl<T: Copy> PerTier<T> {
    pub fn get(&self, class: FareClass) -> T {
        match class {
            FareClass::Tier1 => self.tier1,
            FareClass::Tier2 => self.tier2,
            FareClass::Tier3 => self.tier3,
        }
    }

    pub fn get_mut(&mut self, class: FareClass) -> &mut T {
        match class {
            FareClass::Tier1 => &mut self.tier1,
            FareClass::Tier2 => &mut self.tier2,
            FareClass::Tier3 => &mut self.tier3,
        }
    }

    /// Combine two per-tier values tier by tier.
    pub fn zip_with<U: Copy, R>(&self, other: &PerTier<U>, f: impl Fn(T, U) -> R) -> PerTier<R> {
        PerTier {
            tier1: f(self.tier1, other.tier1),
            tier2: f(self.tier2, other.tier2),
            tier3: f(self.tier3, other.tier3),
        }
    }

    pub fn values(&self) -> [T; 3] {
        [self.tier1, self.tier2, self.tier3]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    #[serde(default, alias = "category")]
    pub fare_class: FareClass,
    #[serde(default = "selected_by_default", deserialize_with = "null_as_selected")]
    pub selected: bool,
}

fn selected_by_default() -> bool {
    true
}

fn null_as_selected<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(selected_by_default))
}

impl Passenger {
    pub fn new(fare_class: FareClass) -> Self {
        Self {
            fare_class,
            selected: true,
        }
    }
}

/// Optional add-on (baggage, transfer, …) billed per unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected_quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_quantity: u32,
}

impl ExtraItem {
    pub fn new(unit_price: Decimal, max_quantity: u32) -> Self {
        Self {
            unit_price,
            selected: false,
            selected_quantity: 0,
            max_quantity,
        }
    }
}

/// Server-side fare snapshot for the whole booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareTable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier1_price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier2_price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier3_price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier1_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier2_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier3_count: u32,
}

impl FareTable {
    pub fn prices(&self) -> PerTier<Decimal> {
        PerTier {
            tier1: self.tier1_price,
            tier2: self.tier2_price,
            tier3: self.tier3_price,
        }
    }

    pub fn counts(&self) -> PerTier<u32> {
        PerTier {
            tier1: self.tier1_count,
            tier2: self.tier2_count,
            tier3: self.tier3_count,
        }
    }
}

/// Everything a receipt / invoice selection modal prices from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableLineItemSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub passengers: Vec<Passenger>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extras: Vec<ExtraItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fare_table: FareTable,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vat_percent: Decimal,
}

/// Result of pricing a selection. Nothing here is rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    /// `true` when at least one passenger is deselected and live counts were used.
    pub partial_selection: bool,
    pub tier_counts: PerTier<u32>,
    pub tier_totals: PerTier<Decimal>,
    pub passenger_subtotal: Decimal,
    pub extras_subtotal: Decimal,
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}
