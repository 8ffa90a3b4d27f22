//! Mock reading generator for demo and offline use
//!
//! Stand-in for the live elevation/weather services. Draws whole meters and
//! whole millimetres, uniform over the ranges below.

use async_trait::async_trait;
use rand::Rng;

use crate::reading::{Elevation, Location, Reading, RAINFALL_DAYS};
use crate::source::{Acquisition, ReadingSource};

/// Exclusive upper bound for mock elevation (meters)
pub const MOCK_ELEVATION_MAX: u32 = 150;

/// Exclusive upper bound for each mock daily rainfall value (mm)
pub const MOCK_RAINFALL_MAX: u32 = 60;

pub const MOCK_LOCATION_NAME: &str = "User Selected Location";

/// Seven mock daily rainfall values drawn from `rng`
pub fn mock_daily_rainfall<R: Rng + ?Sized>(rng: &mut R) -> [f64; RAINFALL_DAYS] {
    let mut days = [0.0; RAINFALL_DAYS];
    for day in days.iter_mut() {
        *day = f64::from(rng.gen_range(0..MOCK_RAINFALL_MAX));
    }
    days
}

/// Full mock reading drawn from `rng`
pub fn mock_reading_with<R: Rng + ?Sized>(rng: &mut R) -> Reading {
    let elevation = Elevation::Meters(f64::from(rng.gen_range(0..MOCK_ELEVATION_MAX)));
    let daily = mock_daily_rainfall(rng);
    Reading::from_daily(elevation, &daily)
}

pub fn generate_mock_reading() -> Reading {
    mock_reading_with(&mut rand::thread_rng())
}

/// [`ReadingSource`] backed by random readings
#[derive(Debug, Clone, Copy, Default)]
pub struct MockReadingGenerator;

impl MockReadingGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReadingSource for MockReadingGenerator {
    async fn acquire(&self, lat: f64, lng: f64) -> Acquisition {
        let reading = generate_mock_reading();
        tracing::debug!(lat, lng, ?reading.elevation, "generated mock reading");

        Acquisition {
            location: Location::new(lat, lng, MOCK_LOCATION_NAME),
            reading,
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
