//! Products

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Garment size for readymade products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    /// Small
    S,
    /// Medium
    M,
    /// Large
    L,
    /// Extra large
    #[serde(rename = "XL")]
    Xl,
    /// Double extra large
    #[serde(rename = "XXL")]
    Xxl,
}

impl Size {
    /// All sizes, smallest first.
    pub const ALL: [Size; 5] = [Size::S, Size::M, Size::L, Size::Xl, Size::Xxl];
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::Xl => "XL",
            Size::Xxl => "XXL",
        };

        write!(f, "{label}")
    }
}

/// Units in stock per size for a readymade product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SizeStock {
    /// Small
    #[serde(rename = "S")]
    pub s: u32,

    /// Medium
    #[serde(rename = "M")]
    pub m: u32,

    /// Large
    #[serde(rename = "L")]
    pub l: u32,

    /// Extra large
    #[serde(rename = "XL")]
    pub xl: u32,

    /// Double extra large
    #[serde(rename = "XXL")]
    pub xxl: u32,
}

impl SizeStock {
    /// Units in stock for the given size.
    #[must_use]
    pub fn units(&self, size: Size) -> u32 {
        match size {
            Size::S => self.s,
            Size::M => self.m,
            Size::L => self.l,
            Size::Xl => self.xl,
            Size::Xxl => self.xxl,
        }
    }

    /// Whether at least one unit of the given size is in stock.
    #[must_use]
    pub fn has(&self, size: Size) -> bool {
        self.units(size) > 0
    }
}

/// Catalog section a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Menswear
    Mens,
    /// Womenswear
    Womens,
    /// Kidswear
    Kids,
    /// Accessories
    Accessories,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Mens => "mens",
            Category::Womens => "womens",
            Category::Kids => "kids",
            Category::Accessories => "accessories",
        };

        write!(f, "{label}")
    }
}

/// Variant-specific catalog data.
///
/// Readymade garments sell in whole units at a fixed price per size,
/// fabrics sell by the meter and may offer a stitching service,
/// accessories sell in whole units with no size dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductKind<'a> {
    /// Off-the-rack garment.
    Readymade {
        /// Unit price
        price: Money<'a, Currency>,
        /// Units in stock per size
        size_stock: SizeStock,
        /// Garment material
        material: String,
        /// Garment color
        color: String,
    },

    /// Fabric sold by the meter.
    Fabric {
        /// Price per meter
        price_per_meter: Money<'a, Currency>,
        /// Meters in stock
        stock_meters: Decimal,
        /// Fabric type, e.g. "Linen"
        fabric_type: String,
        /// Bolt width in inches
        width_inches: u32,
        /// Whether the stitching service is offered for this fabric
        stitching_available: bool,
        /// Price of the stitching service
        stitching_price: Money<'a, Currency>,
    },

    /// Accessory sold in whole units.
    Accessory {
        /// Unit price
        price: Money<'a, Currency>,
        /// Units in stock
        stock: u32,
        /// Accessory material
        material: Option<String>,
        /// Accessory color
        color: Option<String>,
    },
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Stable catalog slug, unique within a catalog
    pub slug: String,

    /// Product name
    pub name: String,

    /// Catalog section
    pub category: Category,

    /// Primary image reference
    pub image: String,

    /// Product tags
    pub tags: Vec<String>,

    /// Variant-specific data
    pub kind: ProductKind<'a>,
}

/// Product catalog, keyed by [`ProductKey`] with a slug index.
///
/// The cart consults the catalog only while constructing a new line item;
/// every price it reads is copied into the item as a snapshot.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    slugs: FxHashMap<String, ProductKey>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Catalog {
            products: SlotMap::with_key(),
            slugs: FxHashMap::default(),
        }
    }

    /// Insert a product, returning its key.
    ///
    /// A product with the same slug as an existing entry replaces that
    /// entry in the slug index; the older product stays reachable by key.
    pub fn insert(&mut self, product: Product<'a>) -> ProductKey {
        let slug = product.slug.clone();
        let key = self.products.insert(product);

        self.slugs.insert(slug, key);

        key
    }

    /// Look up a product by key.
    #[must_use]
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Look up a product key by slug.
    #[must_use]
    pub fn key_for(&self, slug: &str) -> Option<ProductKey> {
        self.slugs.get(slug).copied()
    }

    /// Look up a product by slug.
    #[must_use]
    pub fn product_for(&self, slug: &str) -> Option<&Product<'a>> {
        self.key_for(slug).and_then(|key| self.get(key))
    }

    /// Iterate over all products with their keys.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.products.iter()
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
