//! Monetary formatting for TISS documents
//!
//! Every amount in a document is an exact [`Decimal`] rendered with exactly
//! two fractional digits. Nothing here goes through floating point.
//!
//! A guide's amount is the exact sum of its items rounded once to cents.
//! Batch totals add up guide amounts, so they match the document even when
//! item prices carry sub-cent digits.

use crate::domain::billing::LineItem;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits of every monetary field
pub const MONEY_SCALE: u32 = 2;

/// Rounds half away from zero to cents and pads to two digits
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use rust_decimal::Decimal;
/// use tiss_batcher::core::document::money::format_money;
///
/// assert_eq!(format_money(Decimal::from_str("10").unwrap()), "10.00");
/// assert_eq!(format_money(Decimal::from_str("0.125").unwrap()), "0.13");
/// ```
pub fn format_money(value: Decimal) -> String {
    let mut rounded = round_money(value);
    rounded.rescale(MONEY_SCALE);
    rounded.to_string()
}

/// Rounds half away from zero to cents
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders a quantity without trailing zeros (`2.000` becomes `2`)
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Exact sum of an iterator of amounts
pub fn sum_amounts<'a>(amounts: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    amounts.into_iter().copied().sum()
}

/// Amount of one guide: its items summed exactly, then rounded to cents
pub fn guide_total(items: &[LineItem]) -> Decimal {
    round_money(sum_amounts(items.iter().map(|item| &item.total_price)))
}
