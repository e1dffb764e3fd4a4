//! Stitching
//!
//! Made-to-measure tailoring attached to fabric purchases: a garment
//! style, a fixed set of body measurements, optional free-text notes and
//! a snapshot of the stitching service price.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of the free-text stitching notes, in characters.
pub const MAX_NOTES_LEN: usize = 500;

/// Errors raised while validating a stitching specification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeasurementError {
    /// A measurement fell outside its accepted range (inches).
    #[error("{field} must be between {min}\" and {max}\", got {value}\"")]
    OutOfRange {
        /// Measurement name
        field: &'static str,
        /// Inclusive lower bound in inches
        min: Decimal,
        /// Inclusive upper bound in inches
        max: Decimal,
        /// Rejected value
        value: Decimal,
    },

    /// The free-text notes exceeded [`MAX_NOTES_LEN`] characters.
    #[error("notes must not exceed {MAX_NOTES_LEN} characters, got {0}")]
    NotesTooLong(usize),
}

/// Style of garment to stitch from the purchased fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GarmentStyle {
    /// Long traditional robe (ankle length)
    Jubbah,
    /// Knee-length tunic
    Kurta,
    /// Standard shirt (hip length)
    Shirt,
    /// Traditional Emirati dress (ankle length)
    Kandura,
}

impl GarmentStyle {
    /// All styles offered by the stitching service.
    pub const ALL: [GarmentStyle; 4] = [
        GarmentStyle::Jubbah,
        GarmentStyle::Kurta,
        GarmentStyle::Shirt,
        GarmentStyle::Kandura,
    ];

    /// Short customer-facing description of the style.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            GarmentStyle::Jubbah => "Long traditional robe (ankle length)",
            GarmentStyle::Kurta => "Knee-length tunic",
            GarmentStyle::Shirt => "Standard shirt (hip length)",
            GarmentStyle::Kandura => "Traditional Emirati dress (ankle length)",
        }
    }

    /// Label for the garment-length measurement, which depends on where
    /// the hem falls for this style.
    #[must_use]
    pub fn length_label(&self) -> &'static str {
        match self {
            GarmentStyle::Jubbah | GarmentStyle::Kandura => "Full Length (Shoulder to Ankle)",
            GarmentStyle::Kurta => "Length (Shoulder to Knee)",
            GarmentStyle::Shirt => "Length (Shoulder to Hip)",
        }
    }
}

impl fmt::Display for GarmentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GarmentStyle::Jubbah => "Jubbah",
            GarmentStyle::Kurta => "Kurta",
            GarmentStyle::Shirt => "Shirt",
            GarmentStyle::Kandura => "Kandura",
        };

        write!(f, "{label}")
    }
}

/// The six body measurements taken for a stitching job, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurements {
    /// Around the base of the neck
    pub neck: Decimal,

    /// Around the fullest part of the chest
    pub chest: Decimal,

    /// Around the natural waistline
    pub waist: Decimal,

    /// Shoulder point to shoulder point across the back
    pub shoulder: Decimal,

    /// Shoulder to wrist with the arm slightly bent
    pub sleeve_length: Decimal,

    /// Base of neck to the hem for the chosen style
    pub garment_length: Decimal,
}

impl Measurements {
    /// Validate every measurement against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError::OutOfRange`] for the first field that
    /// falls outside its bounds.
    pub fn validate(&self) -> Result<(), MeasurementError> {
        let checks = [
            ("neck", self.neck, 10, 25),
            ("chest", self.chest, 20, 60),
            ("waist", self.waist, 20, 60),
            ("shoulder", self.shoulder, 10, 30),
            ("sleeve length", self.sleeve_length, 10, 40),
            ("garment length", self.garment_length, 20, 70),
        ];

        for (field, value, min, max) in checks {
            let min = Decimal::from(min);
            let max = Decimal::from(max);

            if value < min || value > max {
                return Err(MeasurementError::OutOfRange {
                    field,
                    min,
                    max,
                    value,
                });
            }
        }

        Ok(())
    }
}

/// Progress of a stitching job through the tailoring workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StitchingStatus {
    /// Not yet started
    #[default]
    Pending,
    /// On the tailor's bench
    InProgress,
    /// Stitched and awaiting dispatch
    Completed,
    /// Handed to the customer
    Delivered,
}

impl fmt::Display for StitchingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StitchingStatus::Pending => "pending",
            StitchingStatus::InProgress => "in progress",
            StitchingStatus::Completed => "completed",
            StitchingStatus::Delivered => "delivered",
        };

        write!(f, "{label}")
    }
}

/// A validated stitching specification attached to a fabric line item.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchingSpec<'a> {
    /// Garment style to stitch
    pub style: GarmentStyle,

    /// Body measurements in inches
    pub measurements: Measurements,

    /// Optional customer notes, at most [`MAX_NOTES_LEN`] characters
    pub notes: Option<String>,

    /// Stitching service price snapshot
    pub price: Money<'a, Currency>,
}

impl<'a> StitchingSpec<'a> {
    /// Create a stitching specification, validating measurements and
    /// note length.
    ///
    /// # Errors
    ///
    /// Returns a [`MeasurementError`] if a measurement is out of range or
    /// the notes are too long.
    pub fn new(
        style: GarmentStyle,
        measurements: Measurements,
        notes: Option<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, MeasurementError> {
        measurements.validate()?;

        if let Some(notes) = notes.as_deref()
            && notes.chars().count() > MAX_NOTES_LEN
        {
            return Err(MeasurementError::NotesTooLong(notes.chars().count()));
        }

        Ok(StitchingSpec {
            style,
            measurements,
            notes,
            price,
        })
    }
}
