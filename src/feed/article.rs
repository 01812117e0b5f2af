use crate::util::validate_url;
use serde::Serialize;
use thiserror::Error;

/// Why a `results` element could not become an [`Article`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArticleError {
    #[error("result is not a JSON object")]
    NotAnObject,
    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),
    #[error("invalid article URL: {0}")]
    InvalidUrl(String),
}

/// One news item from the feed.
///
/// Construction goes through [`Article::new`], so every value in circulation
/// has a non-empty title, section and URL, and the URL is an absolute
/// http(s) link. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    title: String,
    section: String,
    author: Option<String>,
    url: String,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        section: impl Into<String>,
        author: Option<String>,
        url: impl Into<String>,
    ) -> Result<Self, ArticleError> {
        let title = title.into();
        let section = section.into();
        let url = url.into();

        if title.trim().is_empty() {
            return Err(ArticleError::MissingField("webTitle"));
        }
        if section.trim().is_empty() {
            return Err(ArticleError::MissingField("sectionName"));
        }
        if url.trim().is_empty() {
            return Err(ArticleError::MissingField("webUrl"));
        }
        if let Err(e) = validate_url(&url) {
            return Err(ArticleError::InvalidUrl(e.to_string()));
        }

        Ok(Self {
            title,
            section,
            author,
            url,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// `None` when the feed carried no author; `Some("")` is kept distinct.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// The article link exactly as the feed provided it.
    pub fn url(&self) -> &str {
        &self.url
    }
}
