//! Bike-Parts: a priced bill of materials for a custom bicycle
//!
//! This crate resolves a bike specification into concrete vendor product
//! pages, fetches each page concurrently, extracts the product name and price,
//! and aggregates the results into a bill of materials.

pub mod bike;
pub mod bom;
pub mod catalog;
pub mod config;
pub mod extractor;
pub mod orchestrator;
pub mod output;
pub mod resolver;
pub mod url;

use thiserror::Error;

/// Main error type for Bike-Parts operations
#[derive(Debug, Error)]
pub enum BikeError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid selector for vendor '{vendor}': {selector}")]
    InvalidSelector { vendor: String, selector: String },

    #[error("Unknown vendor '{vendor}' referenced by product '{product}'")]
    UnknownVendor { vendor: String, product: String },
}

/// Bike specification errors
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Failed to read bike specification: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse bike specification: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unsupported front gear count: {0} (expected 1, 2 or 3)")]
    FrontGears(u8),

    #[error("Unsupported rear gear count: {0} (expected 1 or 8 to 12)")]
    RearGears(u8),
}

/// A component that could not be mapped to a product
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No catalog rule for {table} (front gears {front}, rear gears {rear})")]
    NoRule {
        table: &'static str,
        front: u8,
        rear: u8,
    },

    #[error("No catalog entry in {table} for {key}")]
    NoEntry { table: &'static str, key: String },

    #[error("Malformed product reference '{0}' (expected vendor:path)")]
    MalformedProduct(String),

    #[error("Unknown vendor '{vendor}' for product '{product}'")]
    UnknownVendor { vendor: String, product: String },
}

/// Failures while retrieving a vendor page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Failures while reading a product out of a fetched page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No extraction profile matches {url}")]
    NoProfile { url: String },

    #[error("Element '{selector}' not found on {url}")]
    MissingNode { url: String, selector: String },

    #[error("Malformed price '{raw}' on {url}")]
    MalformedPrice { url: String, raw: String },
}

/// Either half of a page extraction failing
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Result type alias for Bike-Parts operations
pub type Result<T> = std::result::Result<T, BikeError>;

// Re-export commonly used types
pub use bike::BikeSpecification;
pub use bom::{aggregate, BillOfMaterials, Part, ResolutionError, Stage};
pub use config::Config;
pub use orchestrator::{resolve_parts_for_specification, Orchestrator};
pub use resolver::{resolve, Component, Resolution};
