//! Reading acquisition seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::reading::{Location, Reading};

/// Everything known about a point after acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    pub location: Location,
    pub reading: Reading,
}

/// Produces a [`Reading`] for a coordinate.
///
/// Implementations never fail: a source that cannot reach its backing
/// service substitutes sentinel or mock values so the caller's flow goes on.
#[async_trait]
pub trait ReadingSource: Send + Sync {
    async fn acquire(&self, lat: f64, lng: f64) -> Acquisition;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
