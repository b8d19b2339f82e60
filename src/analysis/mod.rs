//! Analysis Layer
//!
//! Turns raw recognized text into structured coordinate readings.

pub mod coordinates;

pub use coordinates::{extract_coordinates, Coordinates};
