//! Store
//!
//! Durable mirror of a session's cart. Every save writes the full line
//! item sequence to one YAML file per session; on session start the file,
//! if present, rebuilds the cart with all price snapshots intact. Writes
//! are fire-and-forget from the cart's point of view: a failed save never
//! affects the in-memory cart, and the last write wins.

use std::{fs, path::PathBuf};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, LineItem, LineItemId, LineItemKind},
    fixtures::{
        FixtureError,
        products::{currency_for, parse_price},
    },
    products::{Catalog, Size},
    stitching::{GarmentStyle, Measurements, StitchingSpec},
};

/// Errors related to persisting or restoring a cart.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error reading or writing the session file
    #[error("Failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization or parsing error
    #[error("Failed to read session YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A price string in the snapshot could not be parsed
    #[error(transparent)]
    Price(#[from] FixtureError),

    /// A snapshot referenced a product slug the catalog does not have
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// The restored items could not form a cart
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Serialized form of a line item identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IdSnapshot {
    Readymade { size: Size },
    Fabric,
    Custom { seq: u64 },
    Accessory,
}

/// Serialized stitching specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StitchingSnapshot {
    style: GarmentStyle,
    measurements: Measurements,
    #[serde(default)]
    notes: Option<String>,
    price: String,
}

/// Serialized variant data. Prices are stored as `"AMOUNT CUR"` strings
/// so snapshots survive without re-reading the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KindSnapshot {
    Readymade {
        size: Size,
        price: String,
    },
    Fabric {
        price_per_meter: String,
        meters: Decimal,
        #[serde(default)]
        stitching: Option<StitchingSnapshot>,
    },
    Accessory {
        price: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemSnapshot {
    id: IdSnapshot,
    product: String,
    name: String,
    image: String,
    quantity: u32,
    kind: KindSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CartSnapshot {
    currency: String,
    items: Vec<ItemSnapshot>,
}

/// Per-session cart persistence in `{base}/{session}.yml`.
#[derive(Debug)]
pub struct CartStore {
    base_path: PathBuf,
}

impl CartStore {
    /// Create a store rooted at the given directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        CartStore {
            base_path: base_path.into(),
        }
    }

    /// Path of the session file.
    #[must_use]
    pub fn session_path(&self, session: &str) -> PathBuf {
        self.base_path.join(format!("{session}.yml"))
    }

    /// Write the full line item sequence for the session, replacing any
    /// previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if an item's product is missing from the
    /// catalog or the file cannot be written. Callers may treat failures
    /// as non-fatal; the in-memory cart is unaffected either way.
    pub fn save(
        &self,
        session: &str,
        cart: &Cart<'_>,
        catalog: &Catalog<'_>,
    ) -> Result<(), StoreError> {
        let items = cart
            .iter()
            .map(|item| snapshot_item(item, catalog))
            .collect::<Result<Vec<_>, _>>()?;

        let snapshot = CartSnapshot {
            currency: cart.currency().iso_alpha_code.to_string(),
            items,
        };

        fs::create_dir_all(&self.base_path)?;
        fs::write(
            self.session_path(session),
            serde_norway::to_string(&snapshot)?,
        )?;

        Ok(())
    }

    /// Restore the cart for the session.
    ///
    /// Returns `Ok(None)` when no snapshot exists. Prices come back from
    /// the stored strings, never from the catalog, so snapshots taken
    /// before a catalog price change are preserved verbatim.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file cannot be read or parsed, a
    /// slug no longer resolves, or the restored items cannot form a cart.
    pub fn load<'a>(
        &self,
        session: &str,
        catalog: &Catalog<'a>,
    ) -> Result<Option<Cart<'a>>, StoreError> {
        let path = self.session_path(session);

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        let snapshot: CartSnapshot = serde_norway::from_str(&contents)?;

        let currency = currency_for(&snapshot.currency)?;

        let items = snapshot
            .items
            .into_iter()
            .map(|item| restore_item(item, catalog))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Cart::with_items(items, currency)?))
    }

    /// Delete the session snapshot. No-op when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file exists but cannot be removed.
    pub fn forget(&self, session: &str) -> Result<(), StoreError> {
        let path = self.session_path(session);

        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}

fn snapshot_item(item: &LineItem<'_>, catalog: &Catalog<'_>) -> Result<ItemSnapshot, StoreError> {
    let slug = catalog
        .get(item.product())
        .map(|product| product.slug.clone())
        .ok_or_else(|| StoreError::UnknownProduct(item.name().to_string()))?;

    let id = match item.id() {
        LineItemId::Readymade { size, .. } => IdSnapshot::Readymade { size },
        LineItemId::Fabric { .. } => IdSnapshot::Fabric,
        LineItemId::Custom { seq } => IdSnapshot::Custom { seq },
        LineItemId::Accessory { .. } => IdSnapshot::Accessory,
    };

    let kind = match item.kind() {
        LineItemKind::Readymade { size, price } => KindSnapshot::Readymade {
            size: *size,
            price: format_price(*price),
        },
        LineItemKind::Fabric {
            price_per_meter,
            meters,
            stitching,
        } => KindSnapshot::Fabric {
            price_per_meter: format_price(*price_per_meter),
            meters: *meters,
            stitching: stitching.as_ref().map(|spec| StitchingSnapshot {
                style: spec.style,
                measurements: spec.measurements,
                notes: spec.notes.clone(),
                price: format_price(spec.price),
            }),
        },
        LineItemKind::Accessory { price } => KindSnapshot::Accessory {
            price: format_price(*price),
        },
    };

    Ok(ItemSnapshot {
        id,
        product: slug,
        name: item.name().to_string(),
        image: item.image().to_string(),
        quantity: item.quantity(),
        kind,
    })
}

fn restore_item<'a>(
    snapshot: ItemSnapshot,
    catalog: &Catalog<'a>,
) -> Result<LineItem<'a>, StoreError> {
    let product = catalog
        .key_for(&snapshot.product)
        .ok_or_else(|| StoreError::UnknownProduct(snapshot.product.clone()))?;

    let id = match snapshot.id {
        IdSnapshot::Readymade { size } => LineItemId::Readymade { product, size },
        IdSnapshot::Fabric => LineItemId::Fabric { product },
        IdSnapshot::Custom { seq } => LineItemId::Custom { seq },
        IdSnapshot::Accessory => LineItemId::Accessory { product },
    };

    let kind = match snapshot.kind {
        KindSnapshot::Readymade { size, price } => LineItemKind::Readymade {
            size,
            price: parse_money(&price)?,
        },
        KindSnapshot::Fabric {
            price_per_meter,
            meters,
            stitching,
        } => {
            let stitching = stitching
                .map(|spec| -> Result<StitchingSpec<'a>, StoreError> {
                    let price = parse_money(&spec.price)?;

                    StitchingSpec::new(spec.style, spec.measurements, spec.notes, price)
                        .map_err(CartError::from)
                        .map_err(StoreError::from)
                })
                .transpose()?;

            LineItemKind::Fabric {
                price_per_meter: parse_money(&price_per_meter)?,
                meters,
                stitching,
            }
        }
        KindSnapshot::Accessory { price } => LineItemKind::Accessory {
            price: parse_money(&price)?,
        },
    };

    Ok(LineItem::from_parts(
        id,
        product,
        snapshot.name,
        snapshot.image,
        snapshot.quantity,
        kind,
    ))
}

/// Render a money value as an `"AMOUNT CUR"` string, the same format the
/// fixture files use.
fn format_price(money: Money<'_, Currency>) -> String {
    let minor = money.to_minor_units();

    format!(
        "{}.{:02} {}",
        minor / 100,
        (minor % 100).abs(),
        money.currency().iso_alpha_code
    )
}

fn parse_money(price: &str) -> Result<Money<'static, Currency>, StoreError> {
    let (minor, currency) = parse_price(price)?;

    Ok(Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use tempfile::tempdir;
    use testresult::TestResult;

    use crate::{
        cart::NewLineItem,
        products::{Category, Product, ProductKind, SizeStock},
        stitching::GarmentStyle,
    };

    use super::*;

    fn shop_catalog() -> Catalog<'static> {
        let mut catalog = Catalog::new();

        catalog.insert(Product {
            slug: "linen-kurta".to_string(),
            name: "Linen Kurta".to_string(),
            category: Category::Mens,
            image: "linen-kurta.jpg".to_string(),
            tags: vec![],
            kind: ProductKind::Readymade {
                price: Money::from_minor(5000, USD),
                size_stock: SizeStock {
                    m: 8,
                    ..SizeStock::default()
                },
                material: "Linen".to_string(),
                color: "White".to_string(),
            },
        });

        catalog.insert(Product {
            slug: "plain-linen".to_string(),
            name: "Plain Linen".to_string(),
            category: Category::Mens,
            image: "plain-linen.jpg".to_string(),
            tags: vec![],
            kind: ProductKind::Fabric {
                price_per_meter: Money::from_minor(1500, USD),
                stock_meters: Decimal::from(40),
                fabric_type: "Linen".to_string(),
                width_inches: 58,
                stitching_available: true,
                stitching_price: Money::from_minor(3500, USD),
            },
        });

        catalog.insert(Product {
            slug: "prayer-cap".to_string(),
            name: "Prayer Cap".to_string(),
            category: Category::Accessories,
            image: "prayer-cap.jpg".to_string(),
            tags: vec![],
            kind: ProductKind::Accessory {
                price: Money::from_minor(1200, USD),
                stock: 30,
                material: None,
                color: None,
            },
        });

        catalog
    }

    fn fits() -> Measurements {
        Measurements {
            neck: Decimal::from(16),
            chest: Decimal::from(40),
            waist: Decimal::from(34),
            shoulder: Decimal::from(18),
            sleeve_length: Decimal::from(24),
            garment_length: Decimal::from(42),
        }
    }

    #[test]
    fn save_and_load_round_trips_every_item_kind() -> TestResult {
        let dir = tempdir()?;
        let store = CartStore::new(dir.path());
        let catalog = shop_catalog();

        let kurta = catalog.key_for("linen-kurta").ok_or("kurta key")?;
        let linen = catalog.key_for("plain-linen").ok_or("linen key")?;
        let cap = catalog.key_for("prayer-cap").ok_or("cap key")?;

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::readymade(&catalog, kurta, Size::M, 2)?);
        cart.add_item(NewLineItem::fabric(&catalog, linen, Decimal::from(3), 1)?);
        cart.add_item(NewLineItem::stitched_fabric(
            &catalog,
            linen,
            Decimal::new(25, 1),
            1,
            GarmentStyle::Kurta,
            fits(),
            Some("No breast pocket".to_string()),
        )?);
        cart.add_item(NewLineItem::accessory(&catalog, cap, 4)?);

        store.save("session-1", &cart, &catalog)?;

        let restored = store
            .load("session-1", &catalog)?
            .ok_or("expected a stored cart")?;

        let original: Vec<LineItem<'_>> = cart.iter().cloned().collect();
        let loaded: Vec<LineItem<'_>> = restored.iter().cloned().collect();

        assert_eq!(original, loaded);
        assert_eq!(restored.subtotal()?, cart.subtotal()?);
        assert_eq!(restored.currency(), USD);

        Ok(())
    }

    #[test]
    fn load_missing_session_returns_none() -> TestResult {
        let dir = tempdir()?;
        let store = CartStore::new(dir.path());
        let catalog = shop_catalog();

        assert!(store.load("nobody", &catalog)?.is_none());

        Ok(())
    }

    #[test]
    fn snapshots_keep_prices_across_catalog_changes() -> TestResult {
        let dir = tempdir()?;
        let store = CartStore::new(dir.path());
        let catalog = shop_catalog();

        let cap = catalog.key_for("prayer-cap").ok_or("cap key")?;

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::accessory(&catalog, cap, 1)?);

        store.save("session-1", &cart, &catalog)?;

        // Reprice the cap in a fresh catalog; the snapshot must win.
        let mut repriced = shop_catalog();
        repriced.insert(Product {
            slug: "prayer-cap".to_string(),
            name: "Prayer Cap".to_string(),
            category: Category::Accessories,
            image: "prayer-cap.jpg".to_string(),
            tags: vec![],
            kind: ProductKind::Accessory {
                price: Money::from_minor(9900, USD),
                stock: 30,
                material: None,
                color: None,
            },
        });

        let restored = store
            .load("session-1", &repriced)?
            .ok_or("expected a stored cart")?;

        assert_eq!(restored.subtotal()?, Money::from_minor(1200, USD));

        Ok(())
    }

    #[test]
    fn load_with_unknown_slug_is_an_error() -> TestResult {
        let dir = tempdir()?;
        let store = CartStore::new(dir.path());
        let catalog = shop_catalog();

        let cap = catalog.key_for("prayer-cap").ok_or("cap key")?;

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::accessory(&catalog, cap, 1)?);

        store.save("session-1", &cart, &catalog)?;

        let empty_catalog = Catalog::new();
        let result = store.load("session-1", &empty_catalog);

        assert!(matches!(result, Err(StoreError::UnknownProduct(slug)) if slug == "prayer-cap"));

        Ok(())
    }

    #[test]
    fn forget_removes_the_snapshot() -> TestResult {
        let dir = tempdir()?;
        let store = CartStore::new(dir.path());
        let catalog = shop_catalog();

        let cap = catalog.key_for("prayer-cap").ok_or("cap key")?;

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::accessory(&catalog, cap, 1)?);

        store.save("session-1", &cart, &catalog)?;
        store.forget("session-1")?;

        assert!(store.load("session-1", &catalog)?.is_none());

        // Forgetting again is a no-op.
        store.forget("session-1")?;

        Ok(())
    }

    #[test]
    fn format_price_renders_minor_units() {
        let price = Money::from_minor(149_900, USD);

        assert_eq!(format_price(price), "1499.00 USD");
    }
}
