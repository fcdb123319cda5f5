use super::extract_domain;
use crate::UrlError;
use url::Url;

/// Normalizes a URL so that equal pages compare equal
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` schemes
/// 3. Require a host, lowercase it and strip a `www.` prefix
/// 4. Collapse empty segments and drop the trailing slash (except for root `/`)
/// 5. Remove the fragment
/// 6. Remove an empty query string (trailing `?`)
///
/// # Examples
///
/// ```
/// use ripple_stack::url::normalize_url;
///
/// let url = normalize_url("https://WWW.EXAMPLE.COM//docs/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = extract_domain(&url)
        .filter(|host| !host.is_empty())
        .ok_or(UrlError::MissingDomain)?;
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    let path = normalize_path(url.path());
    url.set_path(&path);

    url.set_fragment(None);
    if url.query().is_some_and(str::is_empty) {
        url.set_query(None);
    }

    Ok(url)
}

/// Drops empty segments and the trailing slash; dot segments are already
/// resolved by the parser
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}
