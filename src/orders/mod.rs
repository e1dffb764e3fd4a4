//! Orders
//!
//! At checkout the full line item sequence is copied verbatim into an
//! immutable order snapshot: every price and measurement field is
//! duplicated so later catalog or cart changes cannot reach a placed
//! order. Stitched items enter the tailoring workflow with a pending
//! status that the admin side advances.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, LineItem, LineItemKind},
    pricing::{self, PricingError},
    products::{ProductKey, Size},
    stitching::{GarmentStyle, Measurements, StitchingStatus},
};

pub mod ledger;

/// Errors related to order placement and administration.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A shipping address field fell outside its length bounds.
    #[error("{field} must be between {min} and {max} characters")]
    FieldLength {
        /// Field name
        field: &'static str,
        /// Minimum length in characters
        min: usize,
        /// Maximum length in characters
        max: usize,
    },

    /// The email address is not structurally valid.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The phone number has the wrong length or characters.
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    /// An order cannot be placed from an empty cart.
    #[error("cannot place an order from an empty cart")]
    EmptyCart,

    /// The order has no item at the given position.
    #[error("order has no item {0}")]
    ItemNotFound(usize),

    /// The item has no stitching work to update.
    #[error("item {0} has no stitching work")]
    NoStitchingWork(usize),

    /// No order with the given number exists.
    #[error("unknown order {0}")]
    UnknownOrder(String),

    /// Order periods run from month 1 to 12.
    #[error("invalid order period month {0}")]
    InvalidPeriod(u8),

    /// Errors bubbled up from total calculation.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Shipping address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    /// Recipient's full name
    pub full_name: String,

    /// Email for the order confirmation
    pub email: String,

    /// Phone number for delivery coordination
    pub phone: String,

    /// Street address, apartment, suite
    pub address_line1: String,

    /// Additional address line
    pub address_line2: Option<String>,

    /// City or town
    pub city: String,

    /// State or region
    pub state: String,

    /// ZIP or postal code
    pub postal_code: String,

    /// Country or region
    pub country: String,
}

impl ShippingAddress {
    /// Validate field lengths, the email shape and the phone number.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] describing the first failing field.
    pub fn validate(&self) -> Result<(), OrderError> {
        check_len("full name", &self.full_name, 2, 100)?;
        check_len("address", &self.address_line1, 5, 200)?;
        check_len("city", &self.city, 2, 100)?;
        check_len("postal code", &self.postal_code, 3, 20)?;
        check_len("country", &self.country, 2, 100)?;

        self.validate_email()?;
        self.validate_phone()?;

        Ok(())
    }

    fn validate_email(&self) -> Result<(), OrderError> {
        let email = self.email.as_str();

        if email.chars().count() < 5 {
            return Err(OrderError::InvalidEmail(email.to_string()));
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(OrderError::InvalidEmail(email.to_string()));
        };

        let dotted_domain =
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');

        if local.is_empty() || domain.contains('@') || !dotted_domain {
            return Err(OrderError::InvalidEmail(email.to_string()));
        }

        Ok(())
    }

    fn validate_phone(&self) -> Result<(), OrderError> {
        let phone = self.phone.as_str();
        let length = phone.chars().count();

        let valid_chars = phone
            .chars()
            .all(|c| c.is_ascii_digit() || "+-() ".contains(c));

        if !(10..=20).contains(&length) || !valid_chars {
            return Err(OrderError::InvalidPhone(phone.to_string()));
        }

        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), OrderError> {
    let length = value.chars().count();

    if length < min || length > max {
        return Err(OrderError::FieldLength { field, min, max });
    }

    Ok(())
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Card payment
    Card,
    /// Cash on delivery
    Cod,
    /// UPI transfer
    Upi,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cod => "cod",
            PaymentMethod::Upi => "upi",
        };

        write!(f, "{label}")
    }
}

/// Payment progress, tracked separately from fulfilment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Awaiting payment
    #[default]
    Pending,
    /// Payment received
    Paid,
    /// Payment attempt failed
    Failed,
    /// Payment returned to the customer
    Refunded,
}

/// Fulfilment progress of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Placed, not yet confirmed
    #[default]
    Pending,
    /// Confirmed by the shop
    Confirmed,
    /// Being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Delivered to the customer
    Delivered,
    /// Cancelled
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };

        write!(f, "{label}")
    }
}

/// Human-facing order number: `AT`, two-digit year and month, and a
/// five-digit sequence within that period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderNumber {
    year: u16,
    month: u8,
    sequence: u32,
}

impl OrderNumber {
    /// Create an order number for the given period and sequence.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidPeriod`] when the month is not 1-12.
    pub fn new(year: u16, month: u8, sequence: u32) -> Result<Self, OrderError> {
        if !(1..=12).contains(&month) {
            return Err(OrderError::InvalidPeriod(month));
        }

        Ok(OrderNumber {
            year,
            month,
            sequence,
        })
    }

    /// Sequence within the period.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AT{:02}{:02}{:05}",
            self.year % 100,
            self.month,
            self.sequence
        )
    }
}

/// Stitching details copied into an order item, with its job status.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStitching<'a> {
    /// Garment style to stitch
    pub style: GarmentStyle,

    /// Body measurements in inches
    pub measurements: Measurements,

    /// Customer notes captured as tailoring instructions
    pub special_instructions: Option<String>,

    /// Stitching service price snapshot
    pub price: Money<'a, Currency>,

    /// Tailoring job status
    pub status: StitchingStatus,
}

/// Variant-specific order item snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderItemDetail<'a> {
    /// Readymade garment.
    Readymade {
        /// Selected size
        size: Size,
        /// Unit price snapshot
        price: Money<'a, Currency>,
    },

    /// Fabric cut, optionally with stitching work.
    Fabric {
        /// Length of the cut in meters
        meters: Decimal,
        /// Price-per-meter snapshot
        price_per_meter: Money<'a, Currency>,
        /// Stitching work, if any
        stitching: Option<OrderStitching<'a>>,
    },

    /// Accessory.
    Accessory {
        /// Unit price snapshot
        price: Money<'a, Currency>,
    },
}

/// One line of an order: a verbatim snapshot of a cart line item plus its
/// computed total.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem<'a> {
    /// Catalog product the item referenced
    pub product: ProductKey,

    /// Display name snapshot
    pub name: String,

    /// Image reference snapshot
    pub image: String,

    /// Number of units
    pub quantity: u32,

    /// Variant-specific snapshot
    pub detail: OrderItemDetail<'a>,

    /// Line total at placement time
    pub total: Money<'a, Currency>,
}

impl<'a> OrderItem<'a> {
    fn from_line_item(item: &LineItem<'a>) -> Result<Self, PricingError> {
        let total = pricing::line_total(item)?;

        let detail = match item.kind() {
            LineItemKind::Readymade { size, price } => OrderItemDetail::Readymade {
                size: *size,
                price: *price,
            },
            LineItemKind::Fabric {
                price_per_meter,
                meters,
                stitching,
            } => OrderItemDetail::Fabric {
                meters: *meters,
                price_per_meter: *price_per_meter,
                stitching: stitching.as_ref().map(|spec| OrderStitching {
                    style: spec.style,
                    measurements: spec.measurements,
                    special_instructions: spec.notes.clone(),
                    price: spec.price,
                    status: StitchingStatus::Pending,
                }),
            },
            LineItemKind::Accessory { price } => OrderItemDetail::Accessory { price: *price },
        };

        Ok(OrderItem {
            product: item.product(),
            name: item.name().to_string(),
            image: item.image().to_string(),
            quantity: item.quantity(),
            detail,
            total,
        })
    }

    /// Stitching work attached to this item, if any.
    #[must_use]
    pub fn stitching(&self) -> Option<&OrderStitching<'a>> {
        match &self.detail {
            OrderItemDetail::Fabric { stitching, .. } => stitching.as_ref(),
            _ => None,
        }
    }

    fn stitching_mut(&mut self) -> Option<&mut OrderStitching<'a>> {
        match &mut self.detail {
            OrderItemDetail::Fabric { stitching, .. } => stitching.as_mut(),
            _ => None,
        }
    }
}

/// Everything the checkout form supplies alongside the cart.
#[derive(Debug, Clone)]
pub struct CheckoutDetails<'a> {
    /// Customer identifier; `None` places a guest order
    pub customer: Option<String>,

    /// Shipping address
    pub shipping_address: ShippingAddress,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Tax rate applied to the subtotal
    pub tax_rate: Percentage,

    /// Flat shipping cost
    pub shipping_cost: Money<'a, Currency>,
}

/// An immutable snapshot of a placed order.
///
/// Only the fulfilment status and per-item stitching statuses change
/// after placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    number: OrderNumber,
    customer: String,
    items: Vec<OrderItem<'a>>,
    subtotal: Money<'a, Currency>,
    tax: Money<'a, Currency>,
    shipping_cost: Money<'a, Currency>,
    total: Money<'a, Currency>,
    shipping_address: ShippingAddress,
    status: OrderStatus,
    payment_status: PaymentStatus,
    payment_method: PaymentMethod,
}

impl<'a> Order<'a> {
    /// Snapshot a cart into an order. The caller is responsible for
    /// clearing the cart afterwards; [`ledger::OrderLedger::place_order`]
    /// does both.
    pub(crate) fn from_cart(
        number: OrderNumber,
        cart: &Cart<'a>,
        details: &CheckoutDetails<'a>,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        details.shipping_address.validate()?;

        let items = cart
            .iter()
            .map(OrderItem::from_line_item)
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = cart.subtotal()?;
        let tax = tax_on(subtotal, details.tax_rate)?;
        let total = subtotal.add(tax)?.add(details.shipping_cost)?;

        Ok(Order {
            number,
            customer: details
                .customer
                .clone()
                .unwrap_or_else(|| "guest".to_string()),
            items,
            subtotal,
            tax,
            shipping_cost: details.shipping_cost,
            total,
            shipping_address: details.shipping_address.clone(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: details.payment_method,
        })
    }

    /// Order number.
    #[must_use]
    pub fn number(&self) -> OrderNumber {
        self.number
    }

    /// Customer identifier, `guest` for guest checkouts.
    #[must_use]
    pub fn customer(&self) -> &str {
        &self.customer
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[OrderItem<'a>] {
        &self.items
    }

    /// Sum of line totals at placement time.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Tax charged on the subtotal.
    #[must_use]
    pub fn tax(&self) -> Money<'a, Currency> {
        self.tax
    }

    /// Flat shipping cost.
    #[must_use]
    pub fn shipping_cost(&self) -> Money<'a, Currency> {
        self.shipping_cost
    }

    /// Amount due: subtotal plus tax plus shipping.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Shipping address.
    #[must_use]
    pub fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    /// Fulfilment status.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Payment status.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Payment method.
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Set the fulfilment status.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    /// Advance the stitching status of the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::ItemNotFound`] for an unknown index and
    /// [`OrderError::NoStitchingWork`] when the item carries no stitching
    /// specification.
    pub fn set_stitching_status(
        &mut self,
        index: usize,
        status: StitchingStatus,
    ) -> Result<(), OrderError> {
        let item = self
            .items
            .get_mut(index)
            .ok_or(OrderError::ItemNotFound(index))?;

        let stitching = item
            .stitching_mut()
            .ok_or(OrderError::NoStitchingWork(index))?;

        stitching.status = status;

        Ok(())
    }
}

/// Tax on a subtotal, rounded to whole minor units midpoint away from zero.
fn tax_on<'a>(
    subtotal: Money<'a, Currency>,
    rate: Percentage,
) -> Result<Money<'a, Currency>, OrderError> {
    let minor = rate * Decimal::from(subtotal.to_minor_units());

    let rounded = minor
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::AmountOverflow)?;

    Ok(Money::from_minor(rounded, subtotal.currency()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        cart::NewLineItem,
        products::{Catalog, Category, Product, ProductKind, SizeStock},
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

        catalog
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ayesha Khan".to_string(),
            email: "ayesha@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            address_line1: "14 Mill Road".to_string(),
            address_line2: None,
            city: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            postal_code: "500001".to_string(),
            country: "India".to_string(),
        }
    }

    fn details<'a>() -> CheckoutDetails<'a> {
        CheckoutDetails {
            customer: Some("user_1".to_string()),
            shipping_address: address(),
            payment_method: PaymentMethod::Cod,
            tax_rate: Percentage::from(0.05),
            shipping_cost: Money::from_minor(0, USD),
        }
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

    fn number() -> OrderNumber {
        OrderNumber::new(2026, 8, 1).expect("valid period")
    }

    #[test]
    fn address_validation_accepts_typical_input() -> TestResult {
        address().validate()?;

        Ok(())
    }

    #[test]
    fn address_validation_rejects_short_name() {
        let mut bad = address();
        bad.full_name = "A".to_string();

        assert!(matches!(
            bad.validate(),
            Err(OrderError::FieldLength {
                field: "full name",
                ..
            })
        ));
    }

    #[test]
    fn address_validation_rejects_bad_emails() {
        for email in ["", "a@b", "no-at-sign.com", "@example.com", "a@b@c.com"] {
            let mut bad = address();
            bad.email = email.to_string();

            assert!(
                matches!(bad.validate(), Err(OrderError::InvalidEmail(_))),
                "email {email:?} should be rejected"
            );
        }
    }

    #[test]
    fn address_validation_rejects_bad_phones() {
        for phone in ["12345", "98765 43210 98765 4321 0", "98765abcde"] {
            let mut bad = address();
            bad.phone = phone.to_string();

            assert!(
                matches!(bad.validate(), Err(OrderError::InvalidPhone(_))),
                "phone {phone:?} should be rejected"
            );
        }
    }

    #[test]
    fn order_number_formats_with_period_and_sequence() -> TestResult {
        let number = OrderNumber::new(2026, 8, 17)?;

        assert_eq!(number.to_string(), "AT260800017");
        assert_eq!(number.sequence(), 17);

        Ok(())
    }

    #[test]
    fn order_number_rejects_invalid_month() {
        assert!(matches!(
            OrderNumber::new(2026, 0, 1),
            Err(OrderError::InvalidPeriod(0))
        ));
        assert!(matches!(
            OrderNumber::new(2026, 13, 1),
            Err(OrderError::InvalidPeriod(13))
        ));
    }

    #[test]
    fn from_cart_snapshots_items_and_totals() -> TestResult {
        let catalog = shop_catalog();
        let kurta = catalog.key_for("linen-kurta").expect("kurta key");
        let linen = catalog.key_for("plain-linen").expect("linen key");

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::readymade(&catalog, kurta, Size::M, 2)?);
        cart.add_item(NewLineItem::stitched_fabric(
            &catalog,
            linen,
            Decimal::from(2),
            1,
            GarmentStyle::Kurta,
            fits(),
            Some("Single cuff".to_string()),
        )?);

        let order = Order::from_cart(number(), &cart, &details())?;

        // 100.00 + 65.00 = 165.00, 5% tax = 8.25
        assert_eq!(order.subtotal(), Money::from_minor(16_500, USD));
        assert_eq!(order.tax(), Money::from_minor(825, USD));
        assert_eq!(order.total(), Money::from_minor(17_325, USD));
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.payment_status(), PaymentStatus::Pending);
        assert_eq!(order.customer(), "user_1");

        let stitched = order.items().get(1).expect("stitched item");
        let stitching = stitched.stitching().expect("stitching details");

        assert_eq!(stitching.status, StitchingStatus::Pending);
        assert_eq!(stitching.price, Money::from_minor(3500, USD));
        assert_eq!(
            stitching.special_instructions.as_deref(),
            Some("Single cuff")
        );
        assert_eq!(stitched.total, Money::from_minor(6500, USD));

        Ok(())
    }

    #[test]
    fn from_cart_rejects_empty_cart() {
        let cart = Cart::new(USD);

        let result = Order::from_cart(number(), &cart, &details());

        assert!(matches!(result, Err(OrderError::EmptyCart)));
    }

    #[test]
    fn from_cart_rejects_invalid_address() -> TestResult {
        let catalog = shop_catalog();
        let kurta = catalog.key_for("linen-kurta").expect("kurta key");

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::readymade(&catalog, kurta, Size::M, 1)?);

        let mut bad = details();
        bad.shipping_address.email = "nope".to_string();

        let result = Order::from_cart(number(), &cart, &bad);

        assert!(matches!(result, Err(OrderError::InvalidEmail(_))));

        Ok(())
    }

    #[test]
    fn shipping_cost_is_added_to_total() -> TestResult {
        let catalog = shop_catalog();
        let kurta = catalog.key_for("linen-kurta").expect("kurta key");

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::readymade(&catalog, kurta, Size::M, 1)?);

        let mut with_shipping = details();
        with_shipping.tax_rate = Percentage::from(0.0);
        with_shipping.shipping_cost = Money::from_minor(499, USD);

        let order = Order::from_cart(number(), &cart, &with_shipping)?;

        assert_eq!(order.shipping_cost(), Money::from_minor(499, USD));
        assert_eq!(order.total(), Money::from_minor(5499, USD));

        Ok(())
    }

    #[test]
    fn guest_checkout_records_guest_customer() -> TestResult {
        let catalog = shop_catalog();
        let kurta = catalog.key_for("linen-kurta").expect("kurta key");

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::readymade(&catalog, kurta, Size::M, 1)?);

        let mut guest = details();
        guest.customer = None;

        let order = Order::from_cart(number(), &cart, &guest)?;

        assert_eq!(order.customer(), "guest");

        Ok(())
    }

    #[test]
    fn set_stitching_status_advances_the_job() -> TestResult {
        let catalog = shop_catalog();
        let linen = catalog.key_for("plain-linen").expect("linen key");

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::stitched_fabric(
            &catalog,
            linen,
            Decimal::from(2),
            1,
            GarmentStyle::Jubbah,
            fits(),
            None,
        )?);

        let mut order = Order::from_cart(number(), &cart, &details())?;

        order.set_stitching_status(0, StitchingStatus::InProgress)?;

        let stitching = order
            .items()
            .first()
            .and_then(OrderItem::stitching)
            .expect("stitching details");

        assert_eq!(stitching.status, StitchingStatus::InProgress);

        Ok(())
    }

    #[test]
    fn set_stitching_status_rejects_items_without_stitching() -> TestResult {
        let catalog = shop_catalog();
        let kurta = catalog.key_for("linen-kurta").expect("kurta key");

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::readymade(&catalog, kurta, Size::M, 1)?);

        let mut order = Order::from_cart(number(), &cart, &details())?;

        assert!(matches!(
            order.set_stitching_status(0, StitchingStatus::Completed),
            Err(OrderError::NoStitchingWork(0))
        ));
        assert!(matches!(
            order.set_stitching_status(5, StitchingStatus::Completed),
            Err(OrderError::ItemNotFound(5))
        ));

        Ok(())
    }

    #[test]
    fn set_status_changes_fulfilment_state() -> TestResult {
        let catalog = shop_catalog();
        let kurta = catalog.key_for("linen-kurta").expect("kurta key");

        let mut cart = Cart::new(USD);
        cart.add_item(NewLineItem::readymade(&catalog, kurta, Size::M, 1)?);

        let mut order = Order::from_cart(number(), &cart, &details())?;
        order.set_status(OrderStatus::Confirmed);

        assert_eq!(order.status(), OrderStatus::Confirmed);

        Ok(())
    }
}
