//! Debounced search-as-you-type for the origin field.
//!
//! Every keystroke goes through [`Suggester::input`], which aborts the
//! previous pending task and schedules a new one that waits out the debounce
//! window before calling the [`SuggestSource`]. Each input gets a sequence
//! number; [`SuggestionStream::next`] only yields the update for the latest
//! one, so a response that loses a race with newer typing is dropped.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sunseek_core::{AppConfig, LocationSuggestion};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::SunseekClient;
use crate::error::ClientError;

/// Anything that can turn partial text into place candidates.
pub trait SuggestSource: Send + Sync + 'static {
    fn suggest(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<LocationSuggestion>, ClientError>> + Send;
}

impl SuggestSource for SunseekClient {
    fn suggest(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<LocationSuggestion>, ClientError>> + Send {
        SunseekClient::suggest(self, query)
    }
}

/// Result for one debounced input.
#[derive(Debug)]
pub struct SuggestionUpdate {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<LocationSuggestion>, ClientError>,
}

/// Receiving half of a [`Suggester`].
#[derive(Debug)]
pub struct SuggestionStream {
    rx: mpsc::UnboundedReceiver<SuggestionUpdate>,
    latest: Arc<AtomicU64>,
}

impl SuggestionStream {
    /// Waits for the next update that is still current. Returns `None` once
    /// the [`Suggester`] is dropped and nothing is left to deliver.
    pub async fn next(&mut self) -> Option<SuggestionUpdate> {
        loop {
            let update = self.rx.recv().await?;
            let latest = self.latest.load(Ordering::SeqCst);
            if update.seq == latest {
                return Some(update);
            }
            tracing::debug!(seq = update.seq, latest, "discarding stale suggestions");
        }
    }
}

/// Debounces origin-field input into at most one live suggestion request.
///
/// Must be used from inside a Tokio runtime.
#[derive(Debug)]
pub struct Suggester<S> {
    source: Arc<S>,
    debounce: Duration,
    min_chars: usize,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SuggestionUpdate>,
}

impl<S: SuggestSource> Suggester<S> {
    #[must_use]
    pub fn new(source: Arc<S>, debounce: Duration, min_chars: usize) -> (Self, SuggestionStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        let latest = Arc::new(AtomicU64::new(0));
        let suggester = Self {
            source,
            debounce,
            min_chars,
            latest: Arc::clone(&latest),
            pending: None,
            tx,
        };
        (suggester, SuggestionStream { rx, latest })
    }

    /// Uses the debounce window and minimum length from `config`.
    #[must_use]
    pub fn from_config(source: Arc<S>, config: &AppConfig) -> (Self, SuggestionStream) {
        Self::new(
            source,
            Duration::from_millis(config.suggest_debounce_ms),
            config.suggest_min_chars,
        )
    }

    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Records a keystroke and returns its sequence number.
    ///
    /// Text shorter than the minimum length emits an empty update right away
    /// and issues no request.
    pub fn input(&mut self, text: &str) -> u64 {
        self.abort_pending();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let query = text.trim().to_string();

        if query.is_empty() || query.chars().count() < self.min_chars {
            let _ = self.tx.send(SuggestionUpdate {
                seq,
                query,
                result: Ok(Vec::new()),
            });
            return seq;
        }

        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != seq {
                return;
            }
            tracing::debug!(seq, query = %query, "requesting suggestions");
            let result = source.suggest(&query).await;
            if let Err(err) = &result {
                tracing::warn!(seq, error = %err, "suggestion request failed");
            }
            // The receiver may be gone during teardown.
            let _ = tx.send(SuggestionUpdate { seq, query, result });
        }));
        seq
    }

    /// Drops any pending or in-flight request and invalidates its result.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<S> Drop for Suggester<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use sunseek_core::GeoPoint;

    use super::*;

    /// Echoes the query back as a single suggestion after `latency`.
    struct FakeSource {
        latency: Duration,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(latency: Duration) -> Arc<Self> {
            Arc::new(Self {
                latency,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SuggestSource for FakeSource {
        fn suggest(
            &self,
            query: &str,
        ) -> impl Future<Output = Result<Vec<LocationSuggestion>, ClientError>> + Send {
            self.calls.lock().unwrap().push(query.to_string());
            let latency = self.latency;
            let name = query.to_string();
            async move {
                tokio::time::sleep(latency).await;
                Ok(vec![LocationSuggestion {
                    display_name: name,
                    point: GeoPoint::new(51.5, -0.12).unwrap(),
                }])
            }
        }
    }

    const DEBOUNCE: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_request() {
        let source = FakeSource::new(Duration::ZERO);
        let (mut suggester, mut stream) = Suggester::new(Arc::clone(&source), DEBOUNCE, 2);

        for text in ["Lo", "Lon", "Lond"] {
            suggester.input(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        let update = stream.next().await.expect("an update");

        assert_eq!(update.query, "Lond");
        assert_eq!(update.seq, 3);
        assert_eq!(source.calls(), vec!["Lond".to_string()]);
        assert_eq!(update.result.unwrap()[0].display_name, "Lond");
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_clears_without_request() {
        let source = FakeSource::new(Duration::ZERO);
        let (mut suggester, mut stream) = Suggester::new(Arc::clone(&source), DEBOUNCE, 2);

        suggester.input(" L ");
        let update = stream.next().await.expect("an update");

        assert!(update.result.unwrap().is_empty());
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_cancels_pending_request() {
        let source = FakeSource::new(Duration::ZERO);
        let (mut suggester, mut stream) = Suggester::new(Arc::clone(&source), DEBOUNCE, 2);

        suggester.input("Bath");
        suggester.input("B");
        let update = stream.next().await.expect("an update");
        assert_eq!(update.query, "B");

        tokio::time::sleep(DEBOUNCE * 2).await;
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_input_supersedes_in_flight_request() {
        let source = FakeSource::new(Duration::from_secs(2));
        let (mut suggester, mut stream) = Suggester::new(Arc::clone(&source), DEBOUNCE, 2);

        suggester.input("Paris");
        // Past the debounce window: the slow request is now in flight.
        tokio::time::sleep(Duration::from_millis(400)).await;
        suggester.input("Pari");

        let update = stream.next().await.expect("an update");
        assert_eq!(update.query, "Pari");
        assert_eq!(source.calls(), vec!["Paris".to_string(), "Pari".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn stream_skips_stale_updates() {
        let source = FakeSource::new(Duration::ZERO);
        let (mut suggester, mut stream) = Suggester::new(Arc::clone(&source), DEBOUNCE, 2);

        suggester.input("Leeds");
        tokio::time::sleep(DEBOUNCE * 2).await;
        // The "Leeds" update is queued but a newer keystroke arrives first.
        suggester.input("x");

        let update = stream.next().await.expect("an update");
        assert_eq!(update.query, "x");
        assert_eq!(update.seq, suggester.latest_seq());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_everything_pending() {
        let source = FakeSource::new(Duration::ZERO);
        let (mut suggester, mut stream) = Suggester::new(Arc::clone(&source), DEBOUNCE, 2);

        suggester.input("York");
        suggester.cancel();
        drop(suggester);

        assert!(stream.next().await.is_none());
        assert!(source.calls().is_empty());
    }
}
