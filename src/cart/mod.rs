//! Cart
//!
//! The cart owns an ordered sequence of line items of three kinds:
//! readymade garments, fabric sold by the meter (optionally with a
//! stitching specification attached) and accessories. Every price on a
//! line item is a snapshot taken from the catalog at add time; later
//! catalog changes never reach items already in the cart.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    pricing::{self, PricingError},
    products::{Catalog, Product, ProductKey, ProductKind, Size},
    stitching::{GarmentStyle, MeasurementError, Measurements, StitchingSpec},
};

/// Errors related to cart construction or item creation.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// The product key did not resolve in the catalog.
    #[error("Unknown product")]
    UnknownProduct(ProductKey),

    /// The product is not sold in the requested form.
    #[error("Product {0} is not sold as {1}")]
    KindMismatch(String, &'static str),

    /// The requested size has no stock.
    #[error("Product {0} has no stock in size {1}")]
    SizeUnavailable(String, Size),

    /// The product has no stock at all.
    #[error("Product {0} is out of stock")]
    OutOfStock(String),

    /// More fabric was requested than is in stock.
    #[error("Product {slug} has {available} m in stock, requested {requested} m")]
    InsufficientFabric {
        /// Catalog slug of the fabric
        slug: String,
        /// Requested length in meters
        requested: Decimal,
        /// Available length in meters
        available: Decimal,
    },

    /// The requested fabric length is below the minimum cut.
    #[error("Fabric length must be at least {min} m, got {got} m")]
    FabricBelowMinimum {
        /// Requested length in meters
        got: Decimal,
        /// Minimum purchasable length in meters
        min: Decimal,
    },

    /// Quantity must be a positive integer.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// The fabric does not offer the stitching service.
    #[error("Stitching is not offered for product {0}")]
    StitchingUnavailable(String),

    /// Invalid stitching measurements or notes.
    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}

/// Variant-specific line item data.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemKind<'a> {
    /// Readymade garment in a chosen size.
    Readymade {
        /// Selected size
        size: Size,
        /// Unit price snapshot
        price: Money<'a, Currency>,
    },

    /// Fabric cut, optionally with a stitching specification.
    Fabric {
        /// Price-per-meter snapshot
        price_per_meter: Money<'a, Currency>,
        /// Length of the cut in meters (minimum 0.5)
        meters: Decimal,
        /// Attached stitching specification, if any
        stitching: Option<StitchingSpec<'a>>,
    },

    /// Accessory.
    Accessory {
        /// Unit price snapshot
        price: Money<'a, Currency>,
    },
}

impl<'a> LineItemKind<'a> {
    /// Currency of the item's price snapshot.
    #[must_use]
    pub fn currency(&self) -> &'a Currency {
        match self {
            LineItemKind::Readymade { price, .. } | LineItemKind::Accessory { price } => {
                price.currency()
            }
            LineItemKind::Fabric {
                price_per_meter, ..
            } => price_per_meter.currency(),
        }
    }

    /// Whether this is a fabric cut with a stitching specification.
    ///
    /// Custom-stitched cuts are one-of-a-kind builds and never merge
    /// with any other line item.
    #[must_use]
    pub fn is_custom_stitched(&self) -> bool {
        matches!(
            self,
            LineItemKind::Fabric {
                stitching: Some(_),
                ..
            }
        )
    }
}

/// Identity of a line item.
///
/// The identity is a pure function of the variant-relevant fields and
/// decides whether an add merges into an existing entry or appends a new
/// one. Custom-stitched cuts get a per-cart sequence number instead, so
/// two identical-looking stitching orders never collapse into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItemId {
    /// Readymade garments merge per product and size.
    Readymade {
        /// Catalog product
        product: ProductKey,
        /// Selected size
        size: Size,
    },

    /// Plain fabric cuts merge per product.
    Fabric {
        /// Catalog product
        product: ProductKey,
    },

    /// Custom-stitched cut, unique per add.
    Custom {
        /// Monotonic per-cart sequence number
        seq: u64,
    },

    /// Accessories merge per product.
    Accessory {
        /// Catalog product
        product: ProductKey,
    },
}

/// A line item about to be added to a cart, before it has an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem<'a> {
    /// Catalog product
    pub product: ProductKey,

    /// Display name snapshot
    pub name: String,

    /// Image reference snapshot
    pub image: String,

    /// Number of units, at least 1
    pub quantity: u32,

    /// Variant-specific data
    pub kind: LineItemKind<'a>,
}

impl<'a> NewLineItem<'a> {
    /// Build a readymade line item from the catalog, snapshotting the
    /// current unit price.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is unknown, is not a
    /// readymade garment, the size has no stock, or the quantity is zero.
    pub fn readymade(
        catalog: &Catalog<'a>,
        product: ProductKey,
        size: Size,
        quantity: u32,
    ) -> Result<Self, CartError> {
        let entry = catalog.get(product).ok_or(CartError::UnknownProduct(product))?;

        let ProductKind::Readymade {
            price, size_stock, ..
        } = &entry.kind
        else {
            return Err(CartError::KindMismatch(
                entry.slug.clone(),
                "a readymade garment",
            ));
        };

        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if !size_stock.has(size) {
            return Err(CartError::SizeUnavailable(entry.slug.clone(), size));
        }

        Ok(NewLineItem {
            product,
            name: entry.name.clone(),
            image: entry.image.clone(),
            quantity,
            kind: LineItemKind::Readymade {
                size,
                price: *price,
            },
        })
    }

    /// Build a plain fabric line item from the catalog, snapshotting the
    /// current price per meter.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is unknown, is not a
    /// fabric, the length is below the minimum cut or above stock, or the
    /// quantity is zero.
    pub fn fabric(
        catalog: &Catalog<'a>,
        product: ProductKey,
        meters: Decimal,
        quantity: u32,
    ) -> Result<Self, CartError> {
        let (entry, price_per_meter) = Self::fabric_entry(catalog, product, meters, quantity)?;

        Ok(NewLineItem {
            product,
            name: entry.name.clone(),
            image: entry.image.clone(),
            quantity,
            kind: LineItemKind::Fabric {
                price_per_meter,
                meters,
                stitching: None,
            },
        })
    }

    /// Build a custom-stitched fabric line item from the catalog,
    /// snapshotting both the price per meter and the stitching service
    /// price.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] under the same conditions as
    /// [`NewLineItem::fabric`], when the fabric does not offer stitching,
    /// or when the measurements or notes fail validation.
    pub fn stitched_fabric(
        catalog: &Catalog<'a>,
        product: ProductKey,
        meters: Decimal,
        quantity: u32,
        style: GarmentStyle,
        measurements: Measurements,
        notes: Option<String>,
    ) -> Result<Self, CartError> {
        let (entry, price_per_meter) = Self::fabric_entry(catalog, product, meters, quantity)?;

        let ProductKind::Fabric {
            stitching_available,
            stitching_price,
            ..
        } = &entry.kind
        else {
            return Err(CartError::KindMismatch(entry.slug.clone(), "a fabric"));
        };

        if !stitching_available {
            return Err(CartError::StitchingUnavailable(entry.slug.clone()));
        }

        let spec = StitchingSpec::new(style, measurements, notes, *stitching_price)?;

        Ok(NewLineItem {
            product,
            name: entry.name.clone(),
            image: entry.image.clone(),
            quantity,
            kind: LineItemKind::Fabric {
                price_per_meter,
                meters,
                stitching: Some(spec),
            },
        })
    }

    /// Build an accessory line item from the catalog, snapshotting the
    /// current unit price.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is unknown, is not an
    /// accessory, is out of stock, or the quantity is zero.
    pub fn accessory(
        catalog: &Catalog<'a>,
        product: ProductKey,
        quantity: u32,
    ) -> Result<Self, CartError> {
        let entry = catalog.get(product).ok_or(CartError::UnknownProduct(product))?;

        let ProductKind::Accessory { price, stock, .. } = &entry.kind else {
            return Err(CartError::KindMismatch(entry.slug.clone(), "an accessory"));
        };

        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if *stock == 0 {
            return Err(CartError::OutOfStock(entry.slug.clone()));
        }

        Ok(NewLineItem {
            product,
            name: entry.name.clone(),
            image: entry.image.clone(),
            quantity,
            kind: LineItemKind::Accessory { price: *price },
        })
    }

    /// Check the invariants callers must uphold before handing the item
    /// to [`Cart::add_item`]: quantity at least 1 and, for fabric, a
    /// length of at least half a meter.
    ///
    /// The catalog constructors above enforce these already; this exists
    /// for items assembled by hand.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] describing the violated invariant.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if let LineItemKind::Fabric { meters, .. } = &self.kind
            && *meters < pricing::min_fabric_meters()
        {
            return Err(CartError::FabricBelowMinimum {
                got: *meters,
                min: pricing::min_fabric_meters(),
            });
        }

        Ok(())
    }

    fn fabric_entry<'c>(
        catalog: &'c Catalog<'a>,
        product: ProductKey,
        meters: Decimal,
        quantity: u32,
    ) -> Result<(&'c Product<'a>, Money<'a, Currency>), CartError> {
        let entry = catalog.get(product).ok_or(CartError::UnknownProduct(product))?;

        let ProductKind::Fabric {
            price_per_meter,
            stock_meters,
            ..
        } = &entry.kind
        else {
            return Err(CartError::KindMismatch(entry.slug.clone(), "a fabric"));
        };

        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if meters < pricing::min_fabric_meters() {
            return Err(CartError::FabricBelowMinimum {
                got: meters,
                min: pricing::min_fabric_meters(),
            });
        }

        if meters > *stock_meters {
            return Err(CartError::InsufficientFabric {
                slug: entry.slug.clone(),
                requested: meters,
                available: *stock_meters,
            });
        }

        Ok((entry, *price_per_meter))
    }
}

/// One entry in a cart: a quantity of a single product configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    id: LineItemId,
    product: ProductKey,
    name: String,
    image: String,
    quantity: u32,
    kind: LineItemKind<'a>,
}

impl<'a> LineItem<'a> {
    pub(crate) fn from_parts(
        id: LineItemId,
        product: ProductKey,
        name: String,
        image: String,
        quantity: u32,
        kind: LineItemKind<'a>,
    ) -> Self {
        LineItem {
            id,
            product,
            name,
            image,
            quantity,
            kind,
        }
    }

    /// Identity of the line item.
    #[must_use]
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Catalog product the item references.
    #[must_use]
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Display name snapshot.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image reference snapshot.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Number of units.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Variant-specific data.
    #[must_use]
    pub fn kind(&self) -> &LineItemKind<'a> {
        &self.kind
    }

    /// Attached stitching specification, if this is a stitched fabric cut.
    #[must_use]
    pub fn stitching(&self) -> Option<&StitchingSpec<'a>> {
        match &self.kind {
            LineItemKind::Fabric { stitching, .. } => stitching.as_ref(),
            _ => None,
        }
    }
}

/// Cart
#[derive(Debug)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    currency: &'static Currency,
    custom_seq: u64,
}

impl<'a> Cart<'a> {
    /// Create an empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
            custom_seq: 0,
        }
    }

    /// Rebuild a cart from a previously persisted line item sequence.
    ///
    /// The custom-stitch sequence is re-seeded above any restored id so
    /// later stitched adds can never collide with restored ones.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if there was a currency mismatch error.
    pub fn with_items(
        items: impl Into<Vec<LineItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let item_currency = item.kind.currency();

            if item_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        let custom_seq = items
            .iter()
            .filter_map(|item| match item.id {
                LineItemId::Custom { seq } => Some(seq),
                _ => None,
            })
            .max()
            .map_or(0, |max| max.saturating_add(1));

        Ok(Cart {
            items,
            currency,
            custom_seq,
        })
    }

    /// Add an item to the cart.
    ///
    /// When an existing item has the same identity and the new item is a
    /// mergeable kind (readymade, plain fabric, accessory), quantities are
    /// summed and no other field of the existing entry changes. Otherwise
    /// the item is appended to the end of the sequence. Custom-stitched
    /// fabric always appends under a fresh identity.
    ///
    /// Input is assumed valid; see [`NewLineItem::validate`].
    pub fn add_item(&mut self, item: NewLineItem<'a>) -> LineItemId {
        let id = self.identity_for(&item);

        if !matches!(id, LineItemId::Custom { .. })
            && let Some(existing) = self.items.iter_mut().find(|line| line.id == id)
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return id;
        }

        self.items.push(LineItem {
            id,
            product: item.product,
            name: item.name,
            image: item.image,
            quantity: item.quantity,
            kind: item.kind,
        });

        id
    }

    /// Remove the item with the given identity. No-op when absent.
    pub fn remove_item(&mut self, id: LineItemId) {
        if let Some(position) = self.items.iter().position(|line| line.id == id) {
            self.items.remove(position);
        }
    }

    /// Set the quantity of the item with the given identity.
    ///
    /// A non-positive quantity removes the item, exactly like
    /// [`Cart::remove_item`]. No-op when the identity is absent.
    pub fn update_quantity(&mut self, id: LineItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|line| line.id == id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Empty the cart unconditionally. Used after successful order placement.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get an item by identity.
    #[must_use]
    pub fn get_item(&self, id: LineItemId) -> Option<&LineItem<'a>> {
        self.items.iter().find(|line| line.id == id)
    }

    /// Iterate over the items in display (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.items.iter()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the cart total, recomputed fresh from the current items.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if there was a money arithmetic or
    /// currency mismatch error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        pricing::cart_total(&self.items)
    }

    /// Total number of units across all items (sum of quantities, not the
    /// count of distinct line items).
    #[must_use]
    pub fn total_units(&self) -> u64 {
        pricing::unit_count(&self.items)
    }

    fn identity_for(&mut self, item: &NewLineItem<'a>) -> LineItemId {
        match &item.kind {
            LineItemKind::Readymade { size, .. } => LineItemId::Readymade {
                product: item.product,
                size: *size,
            },
            LineItemKind::Fabric {
                stitching: Some(_), ..
            } => {
                let seq = self.custom_seq;
                self.custom_seq += 1;

                LineItemId::Custom { seq }
            }
            LineItemKind::Fabric { .. } => LineItemId::Fabric {
                product: item.product,
            },
            LineItemKind::Accessory { .. } => LineItemId::Accessory {
                product: item.product,
            },
        }
    }
}
