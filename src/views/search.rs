use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::SearchConfig;
use crate::tmdb::{Media, MetadataApi};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was too short to search; results should be cleared.
    Cleared { seq: u64 },
    Results { seq: u64, query: String, results: Vec<Media> },
}

impl SearchOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            SearchOutcome::Cleared { seq } | SearchOutcome::Results { seq, .. } => *seq,
        }
    }
}

/// Search-as-you-type. Every input cancels the pending request, and only
/// the outcome carrying the latest sequence number is ever handed out, so
/// a slow answer to an old query cannot overwrite a newer one.
pub struct DebouncedSearch {
    api: Arc<dyn MetadataApi>,
    delay: Duration,
    min_query_len: usize,
    seq: u64,
    delivered: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl DebouncedSearch {
    pub fn new(api: Arc<dyn MetadataApi>, config: &SearchConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            delay: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
            seq: 0,
            delivered: 0,
            pending: None,
            tx,
            rx,
        }
    }

    pub fn latest(&self) -> u64 {
        self.seq
    }

    pub fn is_current(&self, outcome: &SearchOutcome) -> bool {
        outcome.seq() == self.seq
    }

    /// Register a new query and (re)arm the debounce timer. Returns the
    /// sequence number assigned to it.
    pub fn input(&mut self, query: &str) -> u64 {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        self.seq += 1;
        let seq = self.seq;
        let query = query.trim().to_string();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let delay = self.delay;
        let min_query_len = self.min_query_len;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let outcome = if query.chars().count() < min_query_len {
                SearchOutcome::Cleared { seq }
            } else {
                let results = match api.search(&query).await {
                    Ok(results) => results,
                    Err(e) => {
                        error!("Error searching for {:?}: {}", query, e);
                        Vec::new()
                    }
                };
                SearchOutcome::Results { seq, query, results }
            };

            // The receiver lives as long as the search itself.
            let _ = tx.send(outcome);
        }));

        seq
    }

    /// True while the latest query's outcome has not been handed out.
    pub fn is_pending(&self) -> bool {
        self.delivered < self.seq
    }

    /// Wait for the outcome of the latest query, discarding superseded ones.
    /// Returns `None` straight away when that outcome was already handed
    /// out or nothing was ever typed.
    pub async fn next_outcome(&mut self) -> Option<SearchOutcome> {
        if !self.is_pending() {
            return None;
        }
        while let Some(outcome) = self.rx.recv().await {
            if self.is_current(&outcome) {
                self.delivered = outcome.seq();
                return Some(outcome);
            }
            debug!("Dropping stale search outcome {} (latest {})", outcome.seq(), self.seq);
        }
        None
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
