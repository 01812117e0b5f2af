//! News feed retrieval: one HTTP GET, parsed into a list of articles.
//!
//! - [`article`] - the [`Article`] record
//! - [`parser`] - JSON extraction of the `results` array
//! - [`fetcher`] - HTTP client setup and the fetch pipeline
//! - [`loader`] - background, cancellable fetches for interactive callers
//!
//! # Example
//!
//! ```no_run
//! use newsfeed::config::Config;
//! use newsfeed::feed::{build_client, fetch_articles};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let client = build_client(&config)?;
//! let articles = fetch_articles(&client, config.request_url()?.as_str()).await;
//! for article in &articles {
//!     println!("{} ({})", article.title(), article.section());
//! }
//! # Ok(())
//! # }
//! ```

pub mod article;
pub mod fetcher;
pub mod loader;
pub mod parser;

pub use article::{Article, ArticleError};
pub use fetcher::{build_client, fetch_articles, try_fetch_articles, FetchError};
pub use loader::{FeedEvent, FeedLoader};
pub use parser::{parse_articles, ParseError, ParseResult};
