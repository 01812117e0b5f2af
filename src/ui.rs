//! Plain-text rendering of the article list and browser hand-off.

use crate::app::FeedState;
use crate::feed::Article;
use crate::util::{sanitize_line, truncate_to_width, validate_url_for_open, UrlError};
use thiserror::Error;

/// Fallback width when stdout is not a terminal.
pub const DEFAULT_WIDTH: usize = 100;

const MSG_LOADING: &str = "Loading news...";
const MSG_EMPTY: &str = "No news to show.";

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Refusing to open article link: {0}")]
    Url(#[from] UrlError),
    #[error("Failed to open browser: {0}")]
    Launch(#[from] std::io::Error),
}

/// Current terminal width in columns, or [`DEFAULT_WIDTH`].
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .ok()
        .filter(|&cols| cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Formats one article as a single line: `  1. Title [Section] by Author`.
///
/// Remote text is sanitized before it reaches the terminal, and the line is
/// truncated to `width` columns.
pub fn render_row(position: usize, article: &Article, width: usize) -> String {
    let mut line = format!(
        "{:>3}. {} [{}]",
        position,
        sanitize_line(article.title()),
        sanitize_line(article.section())
    );
    if let Some(author) = article.author().filter(|a| !a.trim().is_empty()) {
        line.push_str(" by ");
        line.push_str(&sanitize_line(author));
    }
    truncate_to_width(&line, width).into_owned()
}

/// Renders the list, numbered from 1.
pub fn render_rows(articles: &[Article], width: usize) -> Vec<String> {
    articles
        .iter()
        .enumerate()
        .map(|(i, article)| render_row(i + 1, article, width))
        .collect()
}

/// Renders whatever the current state calls for: rows, or a status line.
pub fn render_state(state: &FeedState, width: usize) -> Vec<String> {
    match state {
        FeedState::Idle => Vec::new(),
        FeedState::Loading => vec![MSG_LOADING.to_string()],
        FeedState::Loaded(articles) if articles.is_empty() => vec![MSG_EMPTY.to_string()],
        FeedState::Loaded(articles) => render_rows(articles, width),
        FeedState::Failed(error) => vec![truncate_to_width(
            &format!("Failed to load news: {}", sanitize_line(error)),
            width,
        )
        .into_owned()],
    }
}

/// Opens the article's link in the system browser, as-is.
///
/// The link is only checked for being an http(s) URL without whitespace or
/// control characters; whether it is reachable is up to the browser.
pub fn open_article(article: &Article) -> Result<(), OpenError> {
    validate_url_for_open(article.url())?;
    tracing::debug!(url = %article.url(), "Opening article in browser");
    open::that(article.url())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(title: &str, author: Option<&str>) -> Article {
        Article::new(
            title,
            "World news",
            author.map(str::to_owned),
            "https://example.com/story",
        )
        .unwrap()
    }

    #[test]
    fn test_row_with_author() {
        let row = render_row(1, &article("Headline", Some("Ann Author")), 80);
        assert_eq!(row, "  1. Headline [World news] by Ann Author");
    }

    #[test]
    fn test_row_without_author() {
        assert_eq!(
            render_row(12, &article("Headline", None), 80),
            " 12. Headline [World news]"
        );
        assert_eq!(
            render_row(3, &article("Headline", Some("")), 80),
            "  3. Headline [World news]"
        );
    }

    #[test]
    fn test_row_sanitized_and_truncated() {
        let row = render_row(1, &article("Evil\x1b[2J\ntitle", None), 80);
        assert_eq!(row, "  1. Evil title [World news]");

        let row = render_row(1, &article("A very long headline indeed", None), 20);
        assert_eq!(row, "  1. A very long ...");
    }

    #[test]
    fn test_rows_numbered_in_order() {
        let rows = render_rows(&[article("one", None), article("two", None)], 80);
        assert_eq!(
            rows,
            vec!["  1. one [World news]".to_string(), "  2. two [World news]".to_string()]
        );
    }

    #[test]
    fn test_render_states() {
        assert!(render_state(&FeedState::Idle, 80).is_empty());
        assert_eq!(render_state(&FeedState::Loading, 80), vec![MSG_LOADING]);
        assert_eq!(render_state(&FeedState::Loaded(Vec::new()), 80), vec![MSG_EMPTY]);
        assert_eq!(
            render_state(&FeedState::Failed("HTTP error: status 500".into()), 80),
            vec!["Failed to load news: HTTP error: status 500"]
        );
    }
}
