use crate::catalog::Catalog;
use serde::Deserialize;

/// Main configuration structure for Bike-Parts
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "vendor", default)]
    pub vendors: Vec<VendorProfile>,
    pub catalog: Catalog,
}

impl Config {
    /// Looks up a vendor by its identifier
    pub fn vendor(&self, id: &str) -> Option<&VendorProfile> {
        self.vendors.iter().find(|v| v.id == id)
    }
}

/// Vendor page fetching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Per-request bound covering connect, response and body (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent to vendor sites
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Locale used to display the bill total
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            locale: default_locale(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("bike-parts/{}", env!("CARGO_PKG_VERSION"))
}

fn default_locale() -> String {
    "en-GB".to_string()
}

/// Where a vendor lives and how to read its product pages
#[derive(Debug, Clone, Deserialize)]
pub struct VendorProfile {
    /// Identifier referenced by catalog product entries (e.g. "wiggle")
    pub id: String,

    /// Prefix joined with a catalog product path to form the product URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Host patterns (e.g. "*.wiggle.com") selecting this profile for a URL.
    /// Empty means the host of `base_url`.
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Selector for the element wrapping the product title and price
    pub container: String,

    /// Selector for the title node, relative to the container
    pub title: String,

    /// Selector for a sale price node, preferred when present
    #[serde(rename = "discount-price", default)]
    pub discount_price: Option<String>,

    /// Selector for the standard price node
    pub price: String,

    /// Currency symbol stripped from price text
    #[serde(rename = "currency-symbol", default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Thousands separator removed from price text
    #[serde(rename = "thousands-separator", default = "default_thousands_separator")]
    pub thousands_separator: String,
}

fn default_currency_symbol() -> String {
    "£".to_string()
}

fn default_thousands_separator() -> String {
    ",".to_string()
}
