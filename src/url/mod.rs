//! URL handling module for Bike-Parts
//!
//! This module derives vendor identity from product URLs, matches host
//! patterns, and selects the extraction profile for a page.

mod domain;
mod matcher;

use crate::config::{Config, VendorProfile};
use url::Url;

// Re-export main functions
pub use domain::vendor_key;
pub use matcher::matches_wildcard;

/// Selects the extraction profile for a product URL
///
/// Each vendor is matched by its `hosts` patterns, or by the host of its
/// `base-url` when no patterns are configured. Vendors are checked in
/// configuration order and the first match wins.
///
/// # Arguments
///
/// * `url` - The product page URL
/// * `config` - The configuration holding vendor profiles
///
/// # Returns
///
/// * `Some(&VendorProfile)` - The profile for the URL's host
/// * `None` - The URL is unparsable or no vendor claims its host
///
/// # Examples
///
/// ```
/// use bike_parts::config::default_config;
/// use bike_parts::url::profile_for_url;
///
/// let config = default_config().unwrap();
/// let profile = profile_for_url("https://www.wiggle.com/p/shimano-hg95-10-speed-chain", &config);
/// assert_eq!(profile.map(|p| p.id.as_str()), Some("wiggle"));
/// ```
pub fn profile_for_url<'a>(url: &str, config: &'a Config) -> Option<&'a VendorProfile> {
    let key = Url::parse(url).ok().and_then(|u| vendor_key(&u))?;

    config.vendors.iter().find(|vendor| {
        if vendor.hosts.is_empty() {
            Url::parse(&vendor.base_url)
                .ok()
                .and_then(|base| vendor_key(&base))
                .is_some_and(|base_key| base_key == key)
        } else {
            vendor
                .hosts
                .iter()
                .any(|pattern| matches_wildcard(&pattern.to_lowercase(), &key))
        }
    })
}

/// Joins a catalog product path onto a vendor base URL
///
/// # Examples
///
/// ```
/// use bike_parts::url::join_product_url;
///
/// assert_eq!(
///     join_product_url("https://www.wiggle.com/p/", "shimano-hg95-10-speed-chain"),
///     "https://www.wiggle.com/p/shimano-hg95-10-speed-chain"
/// );
/// assert_eq!(
///     join_product_url("https://www.wiggle.com/p", "/shimano-hg95-10-speed-chain"),
///     "https://www.wiggle.com/p/shimano-hg95-10-speed-chain"
/// );
/// ```
pub fn join_product_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
