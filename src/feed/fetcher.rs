use crate::config::Config;
use crate::feed::article::Article;
use crate::feed::parser::{parse_articles, ParseError, ParseResult};
use crate::util::{validate_url, UrlError};
use futures::StreamExt;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_REDIRECTS: usize = 3;

/// Errors that can occur while fetching the news feed.
///
/// Covers the whole pipeline: request URL, transport, HTTP status, body
/// decoding and JSON extraction. Transport errors are stored without their
/// URL so the API key never ends up in a log line.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request URL is not an absolute http(s) URL. No request was made.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] UrlError),
    /// Network-level error (DNS, connection refused, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(reqwest::Error),
    /// Connect or read timeout elapsed
    #[error("Request timed out")]
    Timeout,
    /// Any response status other than 200 OK
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Response body was not valid UTF-8
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    /// Body could not be turned into a list of articles
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e.without_url())
        }
    }
}

/// Builds the HTTP client used for feed requests.
///
/// Connect and read timeouts come from the config (15s / 10s by default) so
/// a stalled server can never hang the fetch task. Redirects are capped at
/// three hops with loop detection.
pub fn build_client(config: &Config) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .redirect(redirect_policy())
        .connect_timeout(config.connect_timeout())
        .read_timeout(config.read_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(FetchError::Network)
}

fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %redact_url(url),
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Replaces the `api-key` query value so the URL is safe to log.
pub fn redact_url(url: &Url) -> Url {
    let mut redacted = url.clone();
    if url.query().is_none() {
        return redacted;
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api-key" {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

/// Fetches and parses the feed at `url`, reporting every failure.
///
/// Performs exactly one GET, with no retries. Only `200 OK` is accepted.
/// The body is read whole, decoded as UTF-8, and passed to
/// [`parse_articles`]. Elements that could not be parsed are counted in
/// [`ParseResult::skipped`] and logged.
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] - `url` is not an absolute http(s) URL (no request is made)
/// - [`FetchError::Timeout`] - connect or read timeout elapsed
/// - [`FetchError::Network`] - DNS, connection, TLS or redirect failure
/// - [`FetchError::HttpStatus`] - any status other than 200
/// - [`FetchError::ResponseTooLarge`] - body exceeds 10MB
/// - [`FetchError::InvalidUtf8`] - body is not UTF-8
/// - [`FetchError::Parse`] - empty body, invalid JSON or no `results` array
pub async fn try_fetch_articles(
    client: &reqwest::Client,
    url: &str,
) -> Result<ParseResult, FetchError> {
    let url = validate_url(url)?;
    let log_url = redact_url(&url);
    tracing::debug!(url = %log_url, "Fetching news feed");

    let response = client.get(url).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = read_limited_text(response, MAX_FEED_SIZE).await?;
    let parsed = parse_articles(&body)?;

    if parsed.skipped > 0 {
        tracing::warn!(
            url = %log_url,
            skipped = parsed.skipped,
            kept = parsed.articles.len(),
            "Malformed results skipped"
        );
    }
    tracing::debug!(url = %log_url, articles = parsed.articles.len(), "Fetched news feed");

    Ok(parsed)
}

/// Fetches the feed at `url`, degrading every failure to an empty list.
///
/// Callers that need to tell "no news" from "fetch failed" should use
/// [`try_fetch_articles`] instead. Failures are logged at error level.
pub async fn fetch_articles(client: &reqwest::Client, url: &str) -> Vec<Article> {
    match try_fetch_articles(client, url).await {
        Ok(parsed) => parsed.articles,
        Err(e) => {
            log_failure(&e);
            Vec::new()
        }
    }
}

fn log_failure(e: &FetchError) {
    match e {
        FetchError::InvalidUrl(err) => {
            tracing::error!(error = %err, "Problem building the request URL")
        }
        FetchError::HttpStatus(status) => {
            tracing::error!(status = status, "Error response code")
        }
        FetchError::Parse(err) => {
            tracing::error!(error = %err, "Problem parsing the news JSON results")
        }
        other => tracing::error!(error = %other, "Problem retrieving the news JSON results"),
    }
}

async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, FetchError> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| FetchError::InvalidUtf8)
}
