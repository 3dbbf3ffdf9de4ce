//! Selection-based pricing for receipt / invoice creation.
//!
//! A selection prices from the server's fare snapshot until at least one
//! passenger is deselected; from then on it prices from the live per-passenger
//! selection. Selecting every passenger again returns to the snapshot.
//!
//! The selection operations never mutate their input. Each returns a fresh
//! `SelectableLineItemSet` that the caller re-prices with [`aggregate`].

use rust_decimal::Decimal;

use crate::errors::SubmissionError;
use crate::models::{PerTier, PriceBreakdown, SelectableLineItemSet};
use crate::numeric::{clamp_quantity, line_amount, parse_quantity, sum_amounts, vat_of};

/// Price a selection. Never rounds and never fails: amounts past the
/// `Decimal` range saturate at `Decimal::MAX`.
pub fn aggregate(items: &SelectableLineItemSet) -> PriceBreakdown {
    let partial_selection = items.passengers.iter().any(|p| !p.selected);

    let tier_counts = if partial_selection {
        let mut counts = PerTier::<u32>::default();
        for p in items.passengers.iter().filter(|p| p.selected) {
            *counts.get_mut(p.fare_class) += 1;
        }
        counts
    } else {
        items.fare_table.counts()
    };

    let tier_totals =
        tier_counts.zip_with(&items.fare_table.prices(), |count, price| line_amount(price, count));
    let passenger_subtotal = sum_amounts(tier_totals.values());

    let extras_subtotal = sum_amounts(
        items
            .extras
            .iter()
            .filter(|e| e.selected && e.selected_quantity > 0)
            .map(|e| line_amount(e.unit_price, e.selected_quantity)),
    );

    let subtotal = passenger_subtotal.saturating_add(extras_subtotal);
    let vat_amount = vat_of(subtotal, items.vat_percent);

    PriceBreakdown {
        partial_selection,
        tier_counts,
        tier_totals,
        passenger_subtotal,
        extras_subtotal,
        subtotal,
        vat_amount,
        total: subtotal.saturating_add(vat_amount),
    }
}

/// Gate checked before a priced selection becomes a billing document.
pub fn validate_for_submission(items: &SelectableLineItemSet) -> Result<(), SubmissionError> {
    if items.passengers.iter().any(|p| p.selected) {
        Ok(())
    } else {
        Err(SubmissionError::NoPassengerSelected)
    }
}

impl SelectableLineItemSet {
    /// Flip one passenger's selection. Out-of-range indices change nothing.
    #[must_use]
    pub fn toggle_passenger(&self, index: usize) -> Self {
        let mut next = self.clone();
        if let Some(p) = next.passengers.get_mut(index) {
            p.selected = !p.selected;
        }
        next
    }

    /// Flip one extra. Selecting takes the full quantity, deselecting clears it.
    #[must_use]
    pub fn toggle_extra(&self, index: usize) -> Self {
        let mut next = self.clone();
        if let Some(e) = next.extras.get_mut(index) {
            e.selected = !e.selected;
            e.selected_quantity = if e.selected { e.max_quantity } else { 0 };
        }
        next
    }

    /// Apply a typed quantity. Non-numeric input reads as `0`; the value is
    /// clamped to the extra's maximum and selection follows `quantity > 0`.
    #[must_use]
    pub fn set_extra_quantity(&self, index: usize, raw: &str) -> Self {
        let mut next = self.clone();
        if let Some(e) = next.extras.get_mut(index) {
            let quantity = clamp_quantity(parse_quantity(raw), e.max_quantity);
            e.selected_quantity = quantity;
            e.selected = quantity > 0;
        }
        next
    }

    /// Select-all checkbox: all selected → none, otherwise → all.
    #[must_use]
    pub fn toggle_select_all_passengers(&self) -> Self {
        let mut next = self.clone();
        let select = !self.passengers.iter().all(|p| p.selected);
        for p in &mut next.passengers {
            p.selected = select;
        }
        next
    }

    pub fn selected_passenger_count(&self) -> usize {
        self.passengers.iter().filter(|p| p.selected).count()
    }
}
