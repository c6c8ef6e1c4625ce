use crate::bike::{SUPPORTED_FRONT_GEARS, SUPPORTED_REAR_GEARS};
use crate::bom::CurrencyLocale;
use crate::catalog::{parse_product, Catalog, GearRule};
use crate::config::types::{Config, FetcherConfig, VendorProfile};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_vendors(&config.vendors)?;
    validate_catalog(&config.catalog, &config.vendors)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 60, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if CurrencyLocale::from_tag(&config.locale).is_none() {
        return Err(ConfigError::Validation(format!(
            "Unsupported locale '{}'",
            config.locale
        )));
    }

    Ok(())
}

/// Validates vendor profiles
fn validate_vendors(vendors: &[VendorProfile]) -> Result<(), ConfigError> {
    if vendors.is_empty() {
        return Err(ConfigError::Validation(
            "At least one vendor must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for vendor in vendors {
        validate_vendor_id(&vendor.id)?;

        if !seen.insert(vendor.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate vendor id '{}'",
                vendor.id
            )));
        }

        let base = Url::parse(&vendor.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid base-url '{}' for vendor '{}': {}",
                vendor.base_url, vendor.id, e
            ))
        })?;

        if base.scheme() != "https" && base.scheme() != "http" {
            return Err(ConfigError::InvalidUrl(format!(
                "base-url '{}' for vendor '{}' must use http or https",
                vendor.base_url, vendor.id
            )));
        }

        for pattern in &vendor.hosts {
            validate_host_pattern(pattern)?;
        }

        let selectors = [Some(&vendor.container), Some(&vendor.title), Some(&vendor.price)]
            .into_iter()
            .chain(std::iter::once(vendor.discount_price.as_ref()))
            .flatten();
        for selector in selectors {
            if Selector::parse(selector).is_err() {
                return Err(ConfigError::InvalidSelector {
                    vendor: vendor.id.clone(),
                    selector: selector.clone(),
                });
            }
        }

        if vendor.currency_symbol.is_empty() {
            return Err(ConfigError::Validation(format!(
                "currency-symbol for vendor '{}' cannot be empty",
                vendor.id
            )));
        }
    }

    Ok(())
}

/// Validates a vendor identifier: non-empty, alphanumeric + hyphens only
fn validate_vendor_id(id: &str) -> Result<(), ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::Validation(
            "Vendor id cannot be empty".to_string(),
        ));
    }

    if !id.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "Vendor id must contain only alphanumeric characters and hyphens, got '{}'",
            id
        )));
    }

    Ok(())
}

/// Validates the catalog against the declared vendors
fn validate_catalog(catalog: &Catalog, vendors: &[VendorProfile]) -> Result<(), ConfigError> {
    for (table, product) in catalog.products() {
        let product_ref = parse_product(product).map_err(|_| {
            ConfigError::Validation(format!(
                "Malformed product '{}' in {} (expected vendor:path)",
                product, table
            ))
        })?;

        if !vendors.iter().any(|v| v.id == product_ref.vendor) {
            return Err(ConfigError::UnknownVendor {
                vendor: product_ref.vendor.to_string(),
                product: product.to_string(),
            });
        }
    }

    for (table, rules) in catalog.gear_tables() {
        for rule in rules {
            validate_gear_rule(table, rule)?;
        }
    }

    Ok(())
}

/// Validates the gear counts a rule can match or clamp to
fn validate_gear_rule(table: &str, rule: &GearRule) -> Result<(), ConfigError> {
    if let Some(front) = rule.front {
        if !SUPPORTED_FRONT_GEARS.contains(&front) {
            return Err(ConfigError::Validation(format!(
                "{}: front gear count {} is not supported",
                table, front
            )));
        }
    }

    if let Some(rear) = rule.rear {
        if !SUPPORTED_REAR_GEARS.contains(&rear) {
            return Err(ConfigError::Validation(format!(
                "{}: rear gear count {} is not supported",
                table, rear
            )));
        }
    }

    if let Some(clamp) = rule.clamp_rear {
        if !(8..=12).contains(&clamp) {
            return Err(ConfigError::Validation(format!(
                "{}: clamp-rear must be between 8 and 12, got {}",
                table, clamp
            )));
        }
    }

    Ok(())
}

/// Validates a host pattern (supports wildcards and an optional port)
fn validate_host_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host pattern cannot be empty".to_string(),
        ));
    }

    let host = pattern.strip_prefix("*.").unwrap_or(pattern);

    let host = match host.rsplit_once(':') {
        Some((name, port)) => {
            if port.parse::<u16>().is_err() {
                return Err(ConfigError::InvalidPattern(format!(
                    "Host pattern '{}' has an invalid port",
                    pattern
                )));
            }
            name
        }
        None => host,
    };

    validate_domain_string(host)
}

/// Validates a domain string (without wildcard prefix or port)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') && domain != "localhost" {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
