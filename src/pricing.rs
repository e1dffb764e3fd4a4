//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::{LineItem, LineItemKind};

/// Errors that can occur while calculating line or cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// No items were provided, so currency could not be determined.
    #[error("no items provided; cannot determine currency")]
    NoItems,

    /// A derived amount left the representable minor-unit range.
    #[error("amount exceeds the representable minor-unit range")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Minimum purchasable fabric length, in meters.
#[must_use]
pub fn min_fabric_meters() -> Decimal {
    Decimal::new(5, 1)
}

/// Calculates the total for a single line item.
///
/// Readymade garments and accessories cost `price x quantity`. A fabric
/// cut costs `price_per_meter x meters`, plus the stitching service price
/// when a specification is attached, and that per-unit sum is then
/// multiplied by the quantity: stitching is charged per purchased unit,
/// not once per line.
///
/// # Errors
///
/// - [`PricingError::AmountOverflow`]: The amount left the representable
///   minor-unit range.
/// - [`PricingError::Money`]: The stitching price snapshot carries a
///   different currency than the fabric price.
pub fn line_total<'a>(item: &LineItem<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let quantity = Decimal::from(item.quantity());

    match item.kind() {
        LineItemKind::Readymade { price, .. } | LineItemKind::Accessory { price } => {
            let total = Decimal::from(price.to_minor_units())
                .checked_mul(quantity)
                .ok_or(PricingError::AmountOverflow)?;

            to_money(total, price.currency())
        }
        LineItemKind::Fabric {
            price_per_meter,
            meters,
            stitching,
        } => {
            let mut per_unit = Decimal::from(price_per_meter.to_minor_units())
                .checked_mul(*meters)
                .ok_or(PricingError::AmountOverflow)?;

            if let Some(spec) = stitching {
                if spec.price.currency() != price_per_meter.currency() {
                    return Err(PricingError::Money(MoneyError::CurrencyMismatch {
                        expected: price_per_meter.currency().iso_alpha_code,
                        actual: spec.price.currency().iso_alpha_code,
                    }));
                }

                per_unit = per_unit
                    .checked_add(Decimal::from(spec.price.to_minor_units()))
                    .ok_or(PricingError::AmountOverflow)?;
            }

            let total = per_unit
                .checked_mul(quantity)
                .ok_or(PricingError::AmountOverflow)?;

            to_money(total, price_per_meter.currency())
        }
    }
}

/// Calculates the total of a list of line items, recomputed fresh on
/// every call.
///
/// # Errors
///
/// - [`PricingError::NoItems`]: No items were provided, so currency could
///   not be determined.
/// - [`PricingError::Money`]: Money arithmetic or currency mismatch error.
/// - [`PricingError::AmountOverflow`]: A line total left the
///   representable minor-unit range.
pub fn cart_total<'a>(items: &[LineItem<'a>]) -> Result<Money<'a, Currency>, PricingError> {
    let first = items.first().ok_or(PricingError::NoItems)?;

    items.iter().try_fold(
        Money::from_minor(0, first.kind().currency()),
        |acc, item| {
            let total = line_total(item)?;

            acc.add(total).map_err(PricingError::from)
        },
    )
}

/// Total number of units across all items (sum of quantities).
#[must_use]
pub fn unit_count(items: &[LineItem<'_>]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity())).sum()
}

/// Round a minor-unit amount to whole minor units and wrap it as money.
///
/// Fabric cuts with fractional meters are the one place a derived amount
/// can leave minor-unit precision; the rounding happens here, exactly
/// once per derivation, midpoint away from zero.
fn to_money<'a>(minor: Decimal, currency: &'a Currency) -> Result<Money<'a, Currency>, PricingError> {
    let rounded = minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let minor = rounded.to_i64().ok_or(PricingError::AmountOverflow)?;

    Ok(Money::from_minor(minor, currency))
}
