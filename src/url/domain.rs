use url::Url;

/// Derives the vendor host key from a URL
///
/// The key is the lowercase host, followed by `:port` when the URL names a
/// non-default port, so local mirrors on different ports stay distinct.
///
/// # Returns
///
/// * `Some(String)` - The host key
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use bike_parts::url::vendor_key;
///
/// let url = Url::parse("https://WWW.Wiggle.com/p/chain").unwrap();
/// assert_eq!(vendor_key(&url), Some("www.wiggle.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:4100/wiggle/chain").unwrap();
/// assert_eq!(vendor_key(&url), Some("127.0.0.1:4100".to_string()));
/// ```
pub fn vendor_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_simple_host() {
        let url = Url::parse("https://www.dolan-bikes.com/frame/").unwrap();
        assert_eq!(vendor_key(&url), Some("www.dolan-bikes.com".to_string()));
    }

    #[test]
    fn test_key_default_port_omitted() {
        let url = Url::parse("https://www.wiggle.com:443/p/chain").unwrap();
        assert_eq!(vendor_key(&url), Some("www.wiggle.com".to_string()));
    }

    #[test]
    fn test_key_explicit_port_kept() {
        let url = Url::parse("https://www.wiggle.com:8443/p/chain").unwrap();
        assert_eq!(vendor_key(&url), Some("www.wiggle.com:8443".to_string()));
    }

    #[test]
    fn test_key_lowercased() {
        let url = Url::parse("https://Shop.HaloWheels.COM/").unwrap();
        assert_eq!(vendor_key(&url), Some("shop.halowheels.com".to_string()));
    }

    #[test]
    fn test_key_ignores_path_and_query() {
        let url = Url::parse("https://www.genesisbikes.co.uk/frame?colour=red#spec").unwrap();
        assert_eq!(vendor_key(&url), Some("www.genesisbikes.co.uk".to_string()));
    }
}
