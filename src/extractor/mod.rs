//! Vendor page extraction
//!
//! This module turns a vendor product URL into a product name and price:
//! - HTTP fetching with a bounded timeout (single attempt)
//! - Selector-based extraction driven by the vendor's profile
//! - Price text normalization into a two-digit decimal

mod fetcher;
mod parser;
mod price;

pub use fetcher::{build_http_client, fetch_page};
pub use parser::{extract_product, ProductPage};
pub use price::normalize_price;

use crate::config::VendorProfile;
use crate::PageError;
use reqwest::Client;

/// Fetches a product page and extracts its name and price
///
/// One request is made; failures are returned, never retried.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The product page URL
/// * `profile` - The extraction profile of the vendor serving `url`
///
/// # Returns
///
/// * `Ok(ProductPage)` - Name and normalized price
/// * `Err(PageError::Fetch)` - Network error, timeout or non-2xx response
/// * `Err(PageError::Extract)` - A node is missing or the price is malformed
pub async fn extract(
    client: &Client,
    url: &str,
    profile: &VendorProfile,
) -> Result<ProductPage, PageError> {
    let body = fetch_page(client, url).await?;
    let page = extract_product(&body, url, profile)?;

    tracing::debug!("Extracted '{}' at {} from {}", page.name, page.price, url);

    Ok(page)
}
