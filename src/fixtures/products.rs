//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Category, Product, ProductKind, SizeStock},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product slug -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Catalog section
    pub category: Category,

    /// Image reference
    pub image: String,

    /// Product tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Variant-specific fields, discriminated by `type`
    #[serde(flatten)]
    pub kind: ProductKindFixture,
}

/// Variant-specific product fields from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductKindFixture {
    /// Readymade garment
    Readymade {
        /// Unit price (e.g., "1499.00 INR")
        price: String,
        /// Units in stock per size
        #[serde(default)]
        sizes: SizeStock,
        /// Garment material
        material: String,
        /// Garment color
        color: String,
    },

    /// Fabric sold by the meter
    Fabric {
        /// Price per meter (e.g., "450.00 INR")
        price_per_meter: String,
        /// Meters in stock
        stock_meters: Decimal,
        /// Fabric type
        fabric_type: String,
        /// Bolt width in inches
        width_inches: u32,
        /// Whether the stitching service is offered
        #[serde(default = "default_stitching_available")]
        stitching_available: bool,
        /// Stitching service price (e.g., "1200.00 INR")
        stitching_price: String,
    },

    /// Accessory
    Accessory {
        /// Unit price (e.g., "249.00 INR")
        price: String,
        /// Units in stock
        stock: u32,
        /// Accessory material
        #[serde(default)]
        material: Option<String>,
        /// Accessory color
        #[serde(default)]
        color: Option<String>,
    },
}

fn default_stitching_available() -> bool {
    true
}

/// Convert a fixture entry into a catalog product, returning the
/// currency its prices were quoted in.
///
/// # Errors
///
/// Returns an error for malformed prices, unknown currency codes, or a
/// fabric whose stitching price is quoted in a different currency than
/// its per-meter price.
pub fn product_from_fixture<'a>(
    slug: &str,
    fixture: ProductFixture,
) -> Result<(Product<'a>, &'static Currency), FixtureError> {
    let (kind, currency) = match fixture.kind {
        ProductKindFixture::Readymade {
            price,
            sizes,
            material,
            color,
        } => {
            let (minor_units, currency) = parse_price(&price)?;

            (
                ProductKind::Readymade {
                    price: Money::from_minor(minor_units, currency),
                    size_stock: sizes,
                    material,
                    color,
                },
                currency,
            )
        }
        ProductKindFixture::Fabric {
            price_per_meter,
            stock_meters,
            fabric_type,
            width_inches,
            stitching_available,
            stitching_price,
        } => {
            let (per_meter_minor, currency) = parse_price(&price_per_meter)?;
            let (stitching_minor, stitching_currency) = parse_price(&stitching_price)?;

            if stitching_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    stitching_currency.iso_alpha_code.to_string(),
                ));
            }

            (
                ProductKind::Fabric {
                    price_per_meter: Money::from_minor(per_meter_minor, currency),
                    stock_meters,
                    fabric_type,
                    width_inches,
                    stitching_available,
                    stitching_price: Money::from_minor(stitching_minor, currency),
                },
                currency,
            )
        }
        ProductKindFixture::Accessory {
            price,
            stock,
            material,
            color,
        } => {
            let (minor_units, currency) = parse_price(&price)?;

            (
                ProductKind::Accessory {
                    price: Money::from_minor(minor_units, currency),
                    stock,
                    material,
                    color,
                },
                currency,
            )
        }
    };

    let product = Product {
        slug: slug.to_string(),
        name: fixture.name,
        category: fixture.category,
        image: fixture.image,
        tags: fixture.tags,
        kind,
    };

    Ok((product, currency))
}

/// Parse price string (e.g., "2.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = currency_for(currency_code)?;

    Ok((minor_units, currency))
}

/// Resolve a currency code to one of the currencies the shop trades in.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for any other code.
pub fn currency_for(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "INR" => Ok(INR),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
