use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlError {
    /// The URL string could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// The URL contains characters that are unsafe to pass to the system opener.
    #[error("URL contains whitespace or control characters")]
    UnsafeForOpen,
}

/// Validates a URL string for use as a feed request target.
///
/// Accepts any syntactically valid absolute `http`/`https` URL with a host.
/// Unlike a link taken from feed content, the request URL comes from local
/// configuration, so loopback and private addresses are allowed.
///
/// # Errors
///
/// - [`UrlError::Invalid`] if the string does not parse (relative URLs included)
/// - [`UrlError::UnsupportedScheme`] for anything but `http`/`https`
/// - [`UrlError::MissingHost`] if the URL has no host
///
/// # Examples
///
/// ```
/// use newsfeed::util::validate_url;
///
/// let url = validate_url("https://content.guardianapis.com/search?api-key=test").unwrap();
/// assert_eq!(url.host_str(), Some("content.guardianapis.com"));
///
/// assert!(validate_url("not a url").is_err());
/// assert!(validate_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}

/// Validates an article URL before handing it to the system opener.
///
/// The raw string is what gets passed to the opener, so it is checked as-is:
/// whitespace and control characters are rejected before parsing, since
/// `Url::parse` would silently strip some of them.
pub fn validate_url_for_open(url_str: &str) -> Result<(), UrlError> {
    if url_str
        .chars()
        .any(|c| c.is_control() || c.is_whitespace())
    {
        return Err(UrlError::UnsafeForOpen);
    }
    validate_url(url_str).map(|_| ())
}
