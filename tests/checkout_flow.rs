//! Integration test for the full storefront flow against the boutique
//! fixture set.
//!
//! Walks through the prices the fixture defines:
//!
//! 1. Linen Kurta (readymade) - Rs 1499.00, size M
//!    - Added twice (qty 2, then qty 1) -> one line, qty 3, Rs 4497.00
//! 2. Premium Linen (fabric) - Rs 450.00 per meter, stitching Rs 1200.00
//!    - Plain 3 m cut -> Rs 1350.00
//!    - Stitched 2.5 m cut -> (450.00 x 2.5 + 1200.00) x 1 = Rs 2325.00
//! 3. Prayer Cap (accessory) - Rs 249.00, qty 2 -> Rs 498.00
//!
//! Expected subtotal: 4497.00 + 1350.00 + 2325.00 + 498.00 = Rs 8670.00
//!
//! The order is then placed (zero tax and shipping, so the order total
//! equals the subtotal), the cart empties, the tailoring job advances,
//! and the receipt renders every line.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::Money;
use tempfile::tempdir;
use testresult::TestResult;

use atelier::{
    cart::{Cart, LineItemId, NewLineItem},
    fixtures::Fixture,
    orders::{CheckoutDetails, OrderStatus, PaymentMethod, ShippingAddress, ledger::OrderLedger},
    products::Size,
    receipt::OrderReceipt,
    stitching::{GarmentStyle, Measurements, StitchingStatus},
    store::CartStore,
};

fn measurements() -> Measurements {
    Measurements {
        neck: Decimal::from(16),
        chest: Decimal::from(40),
        waist: Decimal::from(34),
        shoulder: Decimal::from(18),
        sleeve_length: Decimal::from(24),
        garment_length: Decimal::from(42),
    }
}

fn checkout_details(currency: &'static rusty_money::iso::Currency) -> CheckoutDetails<'static> {
    CheckoutDetails {
        customer: Some("user_7".to_string()),
        shipping_address: ShippingAddress {
            full_name: "Ayesha Khan".to_string(),
            email: "ayesha@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            address_line1: "14 Mill Road".to_string(),
            address_line2: Some("Flat 3B".to_string()),
            city: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            postal_code: "500001".to_string(),
            country: "India".to_string(),
        },
        payment_method: PaymentMethod::Upi,
        tax_rate: Percentage::from(0.0),
        shipping_cost: Money::from_minor(0, currency),
    }
}

#[test]
fn full_checkout_flow_against_the_boutique_fixture() -> TestResult {
    let fixture = Fixture::from_products("boutique")?;
    let catalog = fixture.catalog();
    let currency = fixture.currency()?;

    let kurta = catalog.key_for("linen-kurta").ok_or("missing linen-kurta")?;
    let linen = catalog
        .key_for("premium-linen")
        .ok_or("missing premium-linen")?;
    let cap = catalog.key_for("prayer-cap").ok_or("missing prayer-cap")?;

    let mut cart = Cart::new(currency);

    // Same product and size merges; quantities sum.
    let kurta_id = cart.add_item(NewLineItem::readymade(catalog, kurta, Size::M, 2)?);
    let merged_id = cart.add_item(NewLineItem::readymade(catalog, kurta, Size::M, 1)?);
    assert_eq!(kurta_id, merged_id);

    cart.add_item(NewLineItem::fabric(catalog, linen, Decimal::from(3), 1)?);

    let stitched_id = cart.add_item(NewLineItem::stitched_fabric(
        catalog,
        linen,
        Decimal::new(25, 1),
        1,
        GarmentStyle::Kurta,
        measurements(),
        Some("No breast pocket".to_string()),
    )?);

    cart.add_item(NewLineItem::accessory(catalog, cap, 2)?);

    assert_eq!(cart.len(), 4);
    assert_eq!(cart.total_units(), 7);
    assert_eq!(cart.subtotal()?, Money::from_minor(867_000, currency));

    // Removing an identity that is not in the cart changes nothing.
    cart.remove_item(LineItemId::Fabric {
        product: catalog
            .key_for("cotton-poplin")
            .ok_or("missing cotton-poplin")?,
    });
    assert_eq!(cart.len(), 4);
    assert_eq!(cart.subtotal()?, Money::from_minor(867_000, currency));

    // The stitched cut keeps its own line even though product and style
    // match the plain cut's product.
    assert!(matches!(stitched_id, LineItemId::Custom { .. }));

    // Persist the session and restore it; snapshots survive verbatim.
    let dir = tempdir()?;
    let store = CartStore::new(dir.path());
    store.save("session-7", &cart, catalog)?;

    let restored = store
        .load("session-7", catalog)?
        .ok_or("expected a persisted cart")?;
    assert_eq!(restored.subtotal()?, cart.subtotal()?);
    assert_eq!(restored.len(), 4);

    // Checkout.
    let mut ledger = OrderLedger::new(2026, 8)?;
    let number = ledger
        .place_order(&mut cart, &checkout_details(currency))?
        .number()
        .to_string();

    assert_eq!(number, "AT260800001");
    assert!(cart.is_empty());
    assert_eq!(cart.subtotal()?, Money::from_minor(0, currency));

    let order = ledger.get(&number).ok_or("order missing from ledger")?;
    assert_eq!(order.total(), Money::from_minor(867_000, currency));
    assert_eq!(order.items().len(), 4);
    assert_eq!(order.customer(), "user_7");

    // Every price field was copied into the order snapshot.
    let stitched = order.items().get(2).ok_or("missing stitched item")?;
    let work = stitched.stitching().ok_or("missing stitching details")?;
    assert_eq!(work.price, Money::from_minor(120_000, currency));
    assert_eq!(work.status, StitchingStatus::Pending);
    assert_eq!(work.special_instructions.as_deref(), Some("No breast pocket"));
    assert_eq!(stitched.total, Money::from_minor(232_500, currency));

    // Admin panel: confirm the order and advance the tailoring job.
    ledger.set_status(&number, OrderStatus::Confirmed)?;
    ledger.set_stitching_status(&number, 2, StitchingStatus::InProgress)?;

    let order = ledger.get(&number).ok_or("order missing from ledger")?;
    assert_eq!(order.status(), OrderStatus::Confirmed);
    assert_eq!(ledger.by_status(OrderStatus::Confirmed).count(), 1);

    // Items without stitching reject job updates.
    assert!(ledger
        .set_stitching_status(&number, 0, StitchingStatus::Completed)
        .is_err());

    // The receipt shows every line and the advanced job status.
    let order = ledger.get(&number).ok_or("order missing from ledger")?;
    let mut out = Vec::new();
    OrderReceipt::new(order).write_to(&mut out)?;
    let output = String::from_utf8(out)?;

    assert!(output.contains(&number));
    assert!(output.contains("Linen Kurta"));
    assert!(output.contains("Premium Linen"));
    assert!(output.contains("Prayer Cap"));
    assert!(output.contains("Custom stitching: Kurta (in progress)"));
    assert!(output.contains("Subtotal:"));
    assert!(output.contains("Total:"));

    Ok(())
}

#[test]
fn update_quantity_and_removal_mirror_each_other() -> TestResult {
    let fixture = Fixture::from_products("boutique")?;
    let catalog = fixture.catalog();
    let currency = fixture.currency()?;

    let cap = catalog.key_for("prayer-cap").ok_or("missing prayer-cap")?;

    let mut cart = Cart::new(currency);
    let id = cart.add_item(NewLineItem::accessory(catalog, cap, 2)?);

    cart.update_quantity(id, 5);
    assert_eq!(cart.total_units(), 5);

    cart.update_quantity(id, 0);
    assert!(cart.is_empty());

    let id = cart.add_item(NewLineItem::accessory(catalog, cap, 2)?);
    cart.update_quantity(id, -5);
    assert!(cart.is_empty());

    Ok(())
}

#[test]
fn stitching_is_refused_where_the_fixture_disables_it() -> TestResult {
    let fixture = Fixture::from_products("boutique")?;
    let catalog = fixture.catalog();

    let poplin = catalog
        .key_for("cotton-poplin")
        .ok_or("missing cotton-poplin")?;

    let result = NewLineItem::stitched_fabric(
        catalog,
        poplin,
        Decimal::from(2),
        1,
        GarmentStyle::Shirt,
        measurements(),
        None,
    );

    assert!(result.is_err(), "cotton-poplin has stitching disabled");

    Ok(())
}
