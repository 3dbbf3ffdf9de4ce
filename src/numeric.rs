//! Small numeric helpers shared by the status engine and the price aggregator.
//!
//! Everything here is exact `Decimal` arithmetic that saturates at
//! `Decimal::MAX` / `Decimal::MIN` instead of panicking. The display helpers
//! (`floor_for_display`, `format_money`) are for views only; nothing in the
//! pricing path rounds.

use rust_decimal::Decimal;

/// Sum a sequence of amounts; an empty sequence sums to zero.
/// Saturates on overflow.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Missing numbers count as zero.
pub fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Lenient integer parse for quantity inputs.
///
/// Leading whitespace and an optional sign are accepted, then the leading run
/// of ASCII digits is read and anything after it ignored. No digits, or a
/// negative value, yields `0`. Values past `u32::MAX` saturate.
pub fn parse_quantity(raw: &str) -> u32 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: u32 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }

    if !seen_digit || negative { 0 } else { value }
}

/// Clamp a requested quantity into `[0, max]`.
pub fn clamp_quantity(value: u32, max: u32) -> u32 {
    value.min(max)
}

/// `price × count`, saturating.
pub fn line_amount(price: Decimal, count: u32) -> Decimal {
    price.saturating_mul(Decimal::from(count))
}

/// VAT on `subtotal` at `vat_percent` percent, unrounded.
pub fn vat_of(subtotal: Decimal, vat_percent: Decimal) -> Decimal {
    subtotal.saturating_mul(vat_percent) / Decimal::ONE_HUNDRED
}

/// Whole-unit floor, as list views show VAT.
pub fn floor_for_display(amount: Decimal) -> Decimal {
    amount.floor()
}

/// Two decimals with `,` thousands separators: `1234567.5` → `1,234,567.50`.
pub fn format_money(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}
