//! Receipt

use std::{fmt::Write as _, io};

use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::orders::{Order, OrderItemDetail};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    Io,
}

/// Renders an order as a table of items followed by a summary block.
///
/// Stitched fabric items get an indented detail row showing the garment
/// style, the tailoring job status and the stitching charge.
#[derive(Debug, Clone)]
pub struct OrderReceipt<'a> {
    order: &'a Order<'a>,
}

impl<'a> OrderReceipt<'a> {
    /// Create a receipt for the given order.
    #[must_use]
    pub fn new(order: &'a Order<'a>) -> Self {
        OrderReceipt { order }
    }

    /// Write the receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let order = self.order;

        writeln!(
            out,
            "\nOrder {} ({}) for {}",
            order.number(),
            order.status(),
            order.customer()
        )
        .map_err(|_err| ReceiptError::Io)?;

        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Details", "Qty", "Unit Price", "Line Total"]);

        let mut item_boundary_rows: SmallVec<[usize; 16]> = smallvec![];
        let mut grey_cells: SmallVec<[(usize, usize); 32]> = smallvec![];

        // Header is row 0.
        let mut current_row = 1;

        for (idx, item) in order.items().iter().enumerate() {
            item_boundary_rows.push(current_row);

            let (details, unit_price) = match &item.detail {
                OrderItemDetail::Readymade { size, price } => {
                    (format!("Size {size}"), format!("{price}"))
                }
                OrderItemDetail::Fabric {
                    meters,
                    price_per_meter,
                    ..
                } => (
                    format!("{meters} m of fabric"),
                    format!("{price_per_meter}/m"),
                ),
                OrderItemDetail::Accessory { price } => ("-".to_string(), format!("{price}")),
            };

            builder.push_record([
                format!("#{:<3}", idx + 1),
                item.name.clone(),
                details,
                item.quantity.to_string(),
                unit_price,
                format!("{}", item.total),
            ]);

            grey_cells.push((current_row, 2));
            current_row += 1;

            if let Some(work) = item.stitching() {
                builder.push_record([
                    String::new(),
                    String::new(),
                    format!("Custom stitching: {} ({})", work.style, work.status),
                    String::new(),
                    format!("+{}", work.price),
                    String::new(),
                ]);

                grey_cells.push((current_row, 2));
                current_row += 1;
            }
        }

        write_receipt_table(&mut out, builder, &item_boundary_rows, grey_cells)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let order = self.order;

        let rows = [
            (" Subtotal:".to_string(), format!("{}  ", order.subtotal())),
            (" Tax:".to_string(), format!("{}  ", order.tax())),
            (
                " Shipping:".to_string(),
                format!("{}  ", order.shipping_cost()),
            ),
            (
                " \x1b[1mTotal:\x1b[0m".to_string(),
                format!("\x1b[1m{}  \x1b[0m", order.total()),
            ),
        ];

        let label_width = rows
            .iter()
            .map(|(label, _)| visible_width(label))
            .max()
            .unwrap_or(0);

        let value_width = rows
            .iter()
            .map(|(_, value)| visible_width(value))
            .max()
            .unwrap_or(0);

        for (label, value) in &rows {
            write_summary_line(out, label, value, label_width, value_width)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::Io)
    }
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    item_boundary_rows: &[usize],
    grey_cells: SmallVec<[(usize, usize); 32]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in item_boundary_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    for (row, col) in grey_cells {
        table.modify((row, col), color_dark_grey());
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::Io)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F; each
/// consecutive run gets a single escape sequence so cell content is left
/// untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::Io)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
