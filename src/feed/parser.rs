use crate::feed::article::{Article, ArticleError};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response body is empty")]
    EmptyBody,
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("response has no `results` array")]
    MissingResults,
}

/// Articles extracted from one response, plus how many elements were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub articles: Vec<Article>,
    pub skipped: usize,
}

/// Extracts articles from a feed response body.
///
/// The array is read from top-level `results`, falling back to
/// `response.results` (the envelope the Guardian API actually returns).
/// Each element maps `webTitle`, `sectionName`, `webUrl` and the optional
/// `authorName` onto an [`Article`]; other keys are ignored.
///
/// Malformed elements are skipped rather than failing the whole response:
/// valid neighbours are kept in their original order and the number of
/// dropped elements is reported in [`ParseResult::skipped`].
///
/// # Errors
///
/// Fails only when there is no usable array at all: empty body, invalid
/// JSON, a non-object root, or no `results` array.
pub fn parse_articles(body: &str) -> Result<ParseResult, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::EmptyBody);
    }

    let root: Value = serde_json::from_str(body)?;
    let root = root.as_object().ok_or(ParseError::NotAnObject)?;
    let results = results_array(root).ok_or(ParseError::MissingResults)?;

    let mut parsed = ParseResult {
        articles: Vec::with_capacity(results.len()),
        skipped: 0,
    };

    for (index, item) in results.iter().enumerate() {
        match article_from_json(item) {
            Ok(article) => parsed.articles.push(article),
            Err(e) => {
                tracing::debug!(index, error = %e, "Skipping malformed result");
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

fn results_array(root: &Map<String, Value>) -> Option<&Vec<Value>> {
    root.get("results")
        .or_else(|| root.get("response").and_then(|r| r.get("results")))
        .and_then(Value::as_array)
}

fn article_from_json(item: &Value) -> Result<Article, ArticleError> {
    let obj = item.as_object().ok_or(ArticleError::NotAnObject)?;

    let title = required_str(obj, "webTitle")?;
    let section = required_str(obj, "sectionName")?;
    let url = required_str(obj, "webUrl")?;
    let author = obj
        .get("authorName")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Article::new(title, section, author, url)
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a str, ArticleError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or(ArticleError::MissingField(key))
}
