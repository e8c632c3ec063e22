//! Price parsing and the fee schedule applied to cart totals.

use rust_decimal::Decimal;

use crate::CoreError;

/// Parses a currency-prefixed price string such as `"₹1,299.00"` into a
/// [`Decimal`].
///
/// Any prefix before the first digit (currency symbol, `"Rs."`, spaces) is
/// ignored, as are thousands separators.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPrice`] when no digits are present, when
/// trailing garbage follows the number, or when the value is negative.
pub fn parse_price(raw: &str) -> Result<Decimal, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidPrice {
        raw: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let start = raw
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| invalid("no digits"))?;
    if raw[..start].contains('-') {
        return Err(invalid("negative amount"));
    }

    let digits: String = raw[start..]
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid("unexpected characters after amount"));
    }

    digits
        .parse::<Decimal>()
        .map_err(|e| invalid(&e.to_string()))
}

/// Fixed charges added on top of the cart subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    pub delivery_fee: Decimal,
    pub convenience_fee: Decimal,
    /// Fraction of the subtotal, e.g. `0.18` for 18 %.
    pub tax_rate: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::from(40),
            convenience_fee: Decimal::from(40),
            tax_rate: Decimal::new(18, 2),
        }
    }
}
