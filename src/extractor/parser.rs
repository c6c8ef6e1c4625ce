//! HTML parser for extracting product name and price
//!
//! Selectors come from the vendor's profile. The title and price nodes are
//! searched inside the first element matching the container selector.

use crate::config::VendorProfile;
use crate::extractor::price::normalize_price;
use crate::ExtractError;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

/// Name and price read from a vendor product page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    /// The product title
    pub name: String,

    /// The normalized price (scale 2)
    pub price: Decimal,
}

/// Parses HTML content and extracts the product name and price
///
/// # Extraction Rules
///
/// - The container node must exist; title and price are looked up within it
/// - The discounted-price node wins when the profile defines one and the page
///   has it with non-empty text
/// - Otherwise the standard price node is used
/// - Node text is whitespace-collapsed before use
///
/// # Arguments
///
/// * `html` - The page body
/// * `url` - The page URL, reported on failure
/// * `profile` - The vendor's extraction profile
///
/// # Returns
///
/// * `Ok(ProductPage)` - Successfully extracted product
/// * `Err(ExtractError)` - A node is absent or the price is malformed
///
/// # Example
///
/// ```
/// use bike_parts::config::default_config;
/// use bike_parts::extractor::extract_product;
///
/// let config = default_config().unwrap();
/// let dolan = config.vendor("dolan").unwrap();
/// let html = r#"<div class="productBuy"><div class="productPanel">
///     <h1>Dolan Pre Cursa</h1><div class="price"><span class="price">£549.99</span></div>
/// </div></div>"#;
/// let page = extract_product(html, "https://www.dolan-bikes.com/", dolan).unwrap();
/// assert_eq!(page.name, "Dolan Pre Cursa");
/// assert_eq!(page.price.to_string(), "549.99");
/// ```
pub fn extract_product(
    html: &str,
    url: &str,
    profile: &VendorProfile,
) -> Result<ProductPage, ExtractError> {
    let document = Html::parse_document(html);

    let container_selector = parse_selector(&profile.container, url)?;
    let container = document
        .select(&container_selector)
        .next()
        .ok_or_else(|| missing(url, &profile.container))?;

    let name = select_text(&container, &profile.title, url)?
        .filter(|name| !name.is_empty())
        .ok_or_else(|| missing(url, &profile.title))?;

    let discounted = match &profile.discount_price {
        Some(selector) => select_text(&container, selector, url)?.filter(|t| !t.is_empty()),
        None => None,
    };

    let raw_price = match discounted {
        Some(text) => text,
        None => select_text(&container, &profile.price, url)?
            .ok_or_else(|| missing(url, &profile.price))?,
    };

    let price = normalize_price(&raw_price, profile, url)?;

    Ok(ProductPage { name, price })
}

/// Text of the first element under `scope` matching `selector`
fn select_text(
    scope: &ElementRef<'_>,
    selector: &str,
    url: &str,
) -> Result<Option<String>, ExtractError> {
    let selector = parse_selector(selector, url)?;

    Ok(scope
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(element.text())))
}

// Profiles are validated on load, so this only fails for hand-built configs
fn parse_selector(selector: &str, url: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|_| missing(url, selector))
}

fn collapse_whitespace<'a>(text: impl Iterator<Item = &'a str>) -> String {
    text.flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn missing(url: &str, selector: &str) -> ExtractError {
    ExtractError::MissingNode {
        url: url.to_string(),
        selector: selector.to_string(),
    }
}
