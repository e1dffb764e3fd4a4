//! Utils

use clap::Parser;

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct DemoCheckoutArgs {
    /// Fixture set to load the catalog from
    #[clap(short, long, default_value = "boutique")]
    pub fixture: String,

    /// Tax rate applied to the subtotal, as a fraction (e.g. 0.05)
    #[clap(short, long, default_value_t = 0.05)]
    pub tax: f64,

    /// Order period year
    #[clap(short, long, default_value_t = 2026)]
    pub year: u16,

    /// Order period month
    #[clap(short, long, default_value_t = 8)]
    pub month: u8,
}
