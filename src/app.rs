use crate::feed::{Article, FeedEvent, FeedLoader};
use tokio::sync::mpsc;

/// What the article list currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Idle,
    Loading,
    /// Fetch succeeded. May be empty, which is not an error.
    Loaded(Vec<Article>),
    /// Fetch failed; the message is shown instead of the list.
    Failed(String),
}

/// Application state: the current list and the loader feeding it.
pub struct App {
    http_client: reqwest::Client,
    request_url: String,
    loader: FeedLoader,
    pub state: FeedState,
}

impl App {
    pub fn new(http_client: reqwest::Client, request_url: impl Into<String>) -> Self {
        Self {
            http_client,
            request_url: request_url.into(),
            loader: FeedLoader::new(),
            state: FeedState::Idle,
        }
    }

    /// Starts a fresh fetch, superseding any load still in flight.
    pub fn refresh(&mut self, event_tx: &mpsc::Sender<FeedEvent>) {
        self.state = FeedState::Loading;
        self.loader.start(
            self.http_client.clone(),
            self.request_url.clone(),
            event_tx.clone(),
        );
    }

    /// Drops the in-flight load. The previous list, if any, is not restored.
    pub fn cancel(&mut self) {
        self.loader.cancel();
        if self.state == FeedState::Loading {
            self.state = FeedState::Idle;
        }
    }

    /// Applies a loader event. Returns false if the event was stale.
    pub fn handle_event(&mut self, event: FeedEvent) -> bool {
        let generation = event.generation();
        if !self.loader.is_current(generation) {
            tracing::debug!(
                expected = self.loader.generation(),
                got = generation,
                "Ignoring stale feed load (generation mismatch)"
            );
            return false;
        }

        self.state = match event {
            FeedEvent::Loaded {
                result: Ok(parsed), ..
            } => {
                tracing::info!(
                    articles = parsed.articles.len(),
                    skipped = parsed.skipped,
                    "Feed loaded"
                );
                FeedState::Loaded(parsed.articles)
            }
            FeedEvent::Loaded { result: Err(e), .. } => {
                tracing::error!(error = %e, "Feed load failed");
                FeedState::Failed(e.to_string())
            }
            FeedEvent::TaskPanicked { error, .. } => {
                FeedState::Failed(format!("Internal error: {error}"))
            }
        };
        true
    }

    pub fn articles(&self) -> &[Article] {
        match &self.state {
            FeedState::Loaded(articles) => articles,
            _ => &[],
        }
    }

    /// Article by 1-based position, as numbered in the rendered list.
    pub fn article(&self, position: usize) -> Option<&Article> {
        position
            .checked_sub(1)
            .and_then(|index| self.articles().get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FetchError, ParseResult};

    fn article(title: &str) -> Article {
        Article::new(title, "News", None, format!("https://example.com/{title}")).unwrap()
    }

    fn app() -> App {
        App::new(reqwest::Client::new(), "https://example.com/search")
    }

    #[test]
    fn test_initial_state_is_idle() {
        let app = app();
        assert_eq!(app.state, FeedState::Idle);
        assert!(app.articles().is_empty());
    }

    #[test]
    fn test_stale_event_ignored() {
        let mut app = app();
        let applied = app.handle_event(FeedEvent::Loaded {
            generation: 7,
            result: Ok(ParseResult::default()),
        });
        assert!(!applied);
        assert_eq!(app.state, FeedState::Idle);
    }

    #[test]
    fn test_current_event_applied() {
        let mut app = app();
        // A fresh loader is at generation 0, so a generation-0 event is current.
        let applied = app.handle_event(FeedEvent::Loaded {
            generation: 0,
            result: Ok(ParseResult {
                articles: vec![article("a"), article("b")],
                skipped: 1,
            }),
        });
        assert!(applied);
        assert_eq!(app.articles().len(), 2);
        assert_eq!(app.article(1).map(Article::title), Some("a"));
        assert_eq!(app.article(2).map(Article::title), Some("b"));
        assert!(app.article(0).is_none());
        assert!(app.article(3).is_none());
    }

    #[test]
    fn test_failure_is_distinct_from_empty() {
        let mut app = app();
        app.handle_event(FeedEvent::Loaded {
            generation: 0,
            result: Ok(ParseResult::default()),
        });
        assert_eq!(app.state, FeedState::Loaded(Vec::new()));

        app.handle_event(FeedEvent::Loaded {
            generation: 0,
            result: Err(FetchError::HttpStatus(500)),
        });
        assert_eq!(app.state, FeedState::Failed("HTTP error: status 500".to_string()));
        assert!(app.articles().is_empty());
    }

    #[test]
    fn test_panic_event_becomes_failure() {
        let mut app = app();
        app.handle_event(FeedEvent::TaskPanicked {
            generation: 0,
            error: "boom".to_string(),
        });
        assert!(matches!(app.state, FeedState::Failed(ref msg) if msg.contains("boom")));
    }

    #[tokio::test]
    async fn test_cancel_returns_to_idle() {
        let mut app = App::new(reqwest::Client::new(), "http://127.0.0.1:9/never");
        let (tx, _rx) = mpsc::channel(1);
        app.refresh(&tx);
        assert_eq!(app.state, FeedState::Loading);

        app.cancel();
        assert_eq!(app.state, FeedState::Idle);
    }
}
