//! Configuration module for Bike-Parts
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files: fetcher settings, per-vendor extraction profiles and the product
//! catalog. A complete configuration is built into the crate.
//!
//! # Example
//!
//! ```no_run
//! use bike_parts::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bike-parts.toml")).unwrap();
//! println!("Vendor requests time out after {}s", config.fetcher.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, VendorProfile};

// Re-export parser functions
pub use parser::{
    compute_config_hash, default_config, hash_config_str, load_config, load_config_with_hash,
    parse_config, DEFAULT_CONFIG,
};
