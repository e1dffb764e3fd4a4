//! Checkout Example
//!
//! Walks a cart through the storefront flow: catalog lookup, merge and
//! append semantics, a custom stitching order, checkout, an admin status
//! update, and the printed receipt.
//!
//! Use `-f` to load a product fixture set by name
//! Use `-t` to set the tax rate as a fraction
//! Use `-y` / `-m` to set the order period

use std::io;

use anyhow::Result;
use clap::Parser;
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::Money;

use atelier::{
    cart::{Cart, NewLineItem},
    fixtures::Fixture,
    orders::{CheckoutDetails, PaymentMethod, ShippingAddress, ledger::OrderLedger},
    products::Size,
    receipt::OrderReceipt,
    stitching::{GarmentStyle, Measurements, StitchingStatus},
    utils::DemoCheckoutArgs,
};

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoCheckoutArgs::parse();

    let fixture = Fixture::from_products(&args.fixture)?;
    let catalog = fixture.catalog();
    let currency = fixture.currency()?;

    let kurta = catalog
        .key_for("linen-kurta")
        .ok_or_else(|| anyhow::anyhow!("fixture has no linen-kurta"))?;
    let linen = catalog
        .key_for("premium-linen")
        .ok_or_else(|| anyhow::anyhow!("fixture has no premium-linen"))?;
    let cap = catalog
        .key_for("prayer-cap")
        .ok_or_else(|| anyhow::anyhow!("fixture has no prayer-cap"))?;

    let mut cart = Cart::new(currency);

    // Two adds of the same product and size merge into one line.
    cart.add_item(NewLineItem::readymade(catalog, kurta, Size::M, 2)?);
    cart.add_item(NewLineItem::readymade(catalog, kurta, Size::M, 1)?);

    // A plain cut and a stitched cut of the same fabric stay separate.
    cart.add_item(NewLineItem::fabric(catalog, linen, Decimal::from(3), 1)?);

    let measurements = Measurements {
        neck: Decimal::from(16),
        chest: Decimal::from(40),
        waist: Decimal::from(34),
        shoulder: Decimal::from(18),
        sleeve_length: Decimal::from(24),
        garment_length: Decimal::from(42),
    };

    cart.add_item(NewLineItem::stitched_fabric(
        catalog,
        linen,
        Decimal::new(25, 1),
        1,
        GarmentStyle::Kurta,
        measurements,
        Some("No breast pocket".to_string()),
    )?);

    cart.add_item(NewLineItem::accessory(catalog, cap, 2)?);

    println!(
        "Cart: {} lines, {} units, subtotal {}",
        cart.len(),
        cart.total_units(),
        cart.subtotal()?
    );

    let details = CheckoutDetails {
        customer: None,
        shipping_address: ShippingAddress {
            full_name: "Ayesha Khan".to_string(),
            email: "ayesha@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            address_line1: "14 Mill Road".to_string(),
            address_line2: None,
            city: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            postal_code: "500001".to_string(),
            country: "India".to_string(),
        },
        payment_method: PaymentMethod::Cod,
        tax_rate: Percentage::from(args.tax),
        shipping_cost: Money::from_minor(0, currency),
    };

    let mut ledger = OrderLedger::new(args.year, args.month)?;
    let number = ledger.place_order(&mut cart, &details)?.number().to_string();

    println!("Placed order {number}; cart now has {} lines", cart.len());

    // The tailor picks up the stitched cut (item index 2).
    ledger.set_stitching_status(&number, 2, StitchingStatus::InProgress)?;

    let order = ledger
        .get(&number)
        .ok_or_else(|| anyhow::anyhow!("order {number} missing from ledger"))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    OrderReceipt::new(order).write_to(&mut handle)?;

    Ok(())
}
