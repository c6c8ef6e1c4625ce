use crate::config::VendorProfile;
use crate::ExtractError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Normalizes vendor price text into a decimal with two fractional digits
///
/// # Normalization Steps
///
/// 1. Strip the vendor's currency symbol
/// 2. Keep only the first whitespace-delimited token
/// 3. Remove the vendor's thousands separator
/// 4. Append ".00" when there is no decimal point
/// 5. Parse as a non-negative decimal with at most two fractional digits
///
/// # Arguments
///
/// * `raw` - The price text as it appears on the page
/// * `profile` - The vendor profile supplying symbol and separator
/// * `url` - The page URL, reported on failure
///
/// # Returns
///
/// * `Ok(Decimal)` - The price, always at scale 2
/// * `Err(ExtractError::MalformedPrice)` - The text is not a price
///
/// # Example
///
/// ```
/// use bike_parts::config::default_config;
/// use bike_parts::extractor::normalize_price;
///
/// let config = default_config().unwrap();
/// let halo = config.vendor("halo").unwrap();
/// let price = normalize_price("£1,234 RRP", halo, "https://www.halowheels.com/").unwrap();
/// assert_eq!(price.to_string(), "1234.00");
/// ```
pub fn normalize_price(raw: &str, profile: &VendorProfile, url: &str) -> Result<Decimal, ExtractError> {
    let malformed = || ExtractError::MalformedPrice {
        url: url.to_string(),
        raw: raw.to_string(),
    };

    let stripped = raw.replace(profile.currency_symbol.as_str(), "");
    let token = stripped.split_whitespace().next().ok_or_else(malformed)?;

    let mut digits = if profile.thousands_separator.is_empty() {
        token.to_string()
    } else {
        token.replace(profile.thousands_separator.as_str(), "")
    };

    if !digits.contains('.') {
        digits.push_str(".00");
    }

    let well_formed = digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() == 1
        && digits.chars().any(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(malformed());
    }

    let mut price = Decimal::from_str(&digits).map_err(|_| malformed())?;
    if price.scale() > 2 {
        return Err(malformed());
    }
    // rescale leaves the value untouched when it cannot hold two more digits
    price.rescale(2);
    if price.scale() != 2 {
        return Err(malformed());
    }

    Ok(price)
}
