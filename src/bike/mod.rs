//! Bike specification module
//!
//! This module holds the per-request description of a bike build and loads it
//! from TOML files for the command-line driver.
//!
//! # Example
//!
//! ```no_run
//! use bike_parts::bike::load_bike_spec;
//! use std::path::Path;
//!
//! let spec = load_bike_spec(Path::new("bike.toml")).unwrap();
//! println!("Building a {}x{} drivetrain", spec.front_gears, spec.rear_gears);
//! ```

mod spec;

pub use spec::{
    BikeSpecification, BrakeType, FrameStyle, GroupsetBrand, HandlebarType, ShifterStyle,
    SpecPatch, WheelPreference, SUPPORTED_FRONT_GEARS, SUPPORTED_REAR_GEARS,
};

use crate::SpecError;
use std::path::Path;

/// Loads and validates a bike specification from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the TOML specification file
///
/// # Returns
///
/// * `Ok(BikeSpecification)` - Successfully loaded and validated specification
/// * `Err(SpecError)` - Failed to read, parse, or validate the specification
pub fn load_bike_spec(path: &Path) -> Result<BikeSpecification, SpecError> {
    let content = std::fs::read_to_string(path)?;
    parse_bike_spec(&content)
}

/// Parses and validates a bike specification from TOML text
pub fn parse_bike_spec(content: &str) -> Result<BikeSpecification, SpecError> {
    let spec: BikeSpecification = toml::from_str(content)?;
    spec.validate()?;
    Ok(spec)
}
