//! Core domain types and pure computations.

pub mod price;
pub mod series;
pub mod indicator;
pub mod stats;
pub mod evaluate;
pub mod analysis;
pub mod params;
pub mod universe;
pub mod error;
