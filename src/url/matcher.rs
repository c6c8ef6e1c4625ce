/// Checks if a vendor host key matches a host pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "www.wiggle.com" matches only "www.wiggle.com"
/// 2. Wildcard match: "*.wiggle.com" matches:
///    - "wiggle.com" (the bare domain)
///    - "www.wiggle.com" (single subdomain)
///    - "eu.shop.wiggle.com" (nested subdomains)
///
/// A port in the candidate must be spelled out in the pattern as well.
///
/// # Examples
///
/// ```
/// use bike_parts::url::matches_wildcard;
///
/// assert!(matches_wildcard("www.wiggle.com", "www.wiggle.com"));
/// assert!(!matches_wildcard("www.wiggle.com", "wiggle.com"));
///
/// assert!(matches_wildcard("*.wiggle.com", "wiggle.com"));
/// assert!(matches_wildcard("*.wiggle.com", "www.wiggle.com"));
/// assert!(!matches_wildcard("*.wiggle.com", "wiggle.co.uk"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}
