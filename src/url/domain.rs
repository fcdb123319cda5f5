use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Returns
///
/// * `Some(String)` - The lowercase domain/host
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_stack::url::extract_domain;
///
/// let url = Url::parse("https://Blog.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
