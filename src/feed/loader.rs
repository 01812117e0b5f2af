use crate::feed::fetcher::{try_fetch_articles, FetchError};
use crate::feed::parser::ParseResult;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Events sent back from a background feed load.
#[derive(Debug)]
pub enum FeedEvent {
    /// A fetch finished.
    ///
    /// Fields:
    /// - `generation`: The loader generation when this fetch was spawned
    /// - `result`: Parsed articles or the error that ended the fetch
    Loaded {
        generation: u64,
        result: Result<ParseResult, FetchError>,
    },
    /// The fetch task panicked.
    TaskPanicked { generation: u64, error: String },
}

impl FeedEvent {
    pub fn generation(&self) -> u64 {
        match self {
            FeedEvent::Loaded { generation, .. } | FeedEvent::TaskPanicked { generation, .. } => {
                *generation
            }
        }
    }
}

/// Runs feed fetches off the interactive path, one at a time.
///
/// Starting a new load aborts the previous task and bumps the generation
/// counter. Results carry the generation they were spawned with, so a
/// response that was already queued when it got superseded can be
/// recognized with [`FeedLoader::is_current`] and dropped.
#[derive(Debug, Default)]
pub struct FeedLoader {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl FeedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a fetch of `url` and returns its generation.
    ///
    /// Must be called from within a tokio runtime. The outcome is delivered
    /// as exactly one [`FeedEvent`] on `tx`, unless the load is superseded
    /// or cancelled first.
    pub fn start(
        &mut self,
        client: reqwest::Client,
        url: impl Into<String>,
        tx: mpsc::Sender<FeedEvent>,
    ) -> u64 {
        if self.abort_in_flight() {
            tracing::debug!(generation = self.generation, "Aborted superseded feed load");
        }

        self.generation += 1;
        let generation = self.generation;
        let url = url.into();

        tracing::debug!(generation, "Starting feed load");
        self.handle = Some(tokio::spawn(async move {
            let fetch = AssertUnwindSafe(try_fetch_articles(&client, &url)).catch_unwind();
            let event = match fetch.await {
                Ok(result) => FeedEvent::Loaded { generation, result },
                Err(panic) => {
                    let error = panic_message(panic.as_ref());
                    tracing::error!(task = "feed_load", generation, error = %error, "Background task panicked");
                    FeedEvent::TaskPanicked { generation, error }
                }
            };

            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, event = "Loaded", "Channel send failed (receiver dropped)");
            }
        }));

        generation
    }

    /// Cancels any in-flight load and invalidates results already queued.
    pub fn cancel(&mut self) {
        if self.abort_in_flight() {
            tracing::debug!(generation = self.generation, "Cancelled feed load");
        }
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if a result tagged `generation` belongs to the latest load.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn abort_in_flight(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for FeedLoader {
    fn drop(&mut self) {
        if self.abort_in_flight() {
            tracing::debug!("Aborted feed load on drop");
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
