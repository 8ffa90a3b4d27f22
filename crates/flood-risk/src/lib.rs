//! Flood Risk Library
//!
//! Reading model, threshold classifier and mock data source for FloodLens.
//!
//! # Classification Rule
//!
//! ```text
//! High  ⇔  elevation available ∧ elevation < 50 m ∧ rainfall_today > 50 mm
//! ```
//!
//! | Input | Threshold | Unit |
//! |-------|-----------|------|
//! | Elevation | < 50 | meters |
//! | Rainfall (today) | > 50 | mm |
//!
//! Everything else is Low. An unavailable elevation can never confirm High.
//!
//! Readings come from a [`ReadingSource`]: either the live lookups in
//! `geo-lookup` or the [`MockReadingGenerator`] defined here.

pub mod mock;
pub mod outlook;
pub mod reading;
pub mod risk;
pub mod source;

// Re-exports
pub use mock::{
    generate_mock_reading, mock_daily_rainfall, mock_reading_with, MockReadingGenerator,
    MOCK_LOCATION_NAME,
};
pub use outlook::Outlook;
pub use reading::{Elevation, Location, Reading, RAINFALL_DAYS};
pub use risk::{evaluate, RiskAssessment, RiskLevel};
pub use source::{Acquisition, ReadingSource};

/// Elevation below which a location counts as low-lying (meters)
pub const LOW_ELEVATION_M: f64 = 50.0;

/// Daily rainfall above which rain counts as heavy (mm)
pub const HEAVY_RAINFALL_MM: f64 = 50.0;

/// Daily rainfall above which next-day flooding is predicted (mm)
pub const EXTREME_RAINFALL_MM: f64 = 100.0;
