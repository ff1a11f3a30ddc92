use crate::models::GeocodeCandidate;
use crate::services::GeocoderClient;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Map size above which idle generation entries are swept.
const SWEEP_THRESHOLD: usize = 64;

#[derive(Debug)]
struct Generation {
    counter: u64,
    touched: Instant,
}

/// Debounced suggestion scheduler.
///
/// Search-as-you-type is modeled as a cancellable scheduled task keyed by
/// input identity, not a bare timer. Each call for a key bumps that key's
/// generation and waits out the quiet window; only the call whose generation
/// survives the window talks to the geocoder. A superseded call returns
/// `None` without making a provider request, which is also the stale-response
/// guard: its result can never be applied over a newer input.
pub struct SuggestScheduler {
    geocoder: Arc<GeocoderClient>,
    debounce: Duration,
    // Entries untouched this long are dead; must exceed the debounce window
    // so a sleeping task's entry is never swept out from under it.
    idle_ttl: Duration,
    min_query_len: usize,
    generations: Mutex<HashMap<String, Generation>>,
}

impl SuggestScheduler {
    pub fn new(geocoder: Arc<GeocoderClient>, debounce_ms: u64, min_query_len: usize) -> Self {
        let debounce = Duration::from_millis(debounce_ms);
        Self {
            geocoder,
            debounce,
            idle_ttl: debounce * 8,
            min_query_len,
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Schedule a suggestion fetch for `key` (the input field identity).
    ///
    /// Returns `None` when a later call for the same key superseded this
    /// one, `Some(vec![])` for short queries or provider failures, and
    /// `Some(candidates)` otherwise.
    pub async fn suggest(&self, key: &str, query: &str) -> Option<Vec<GeocodeCandidate>> {
        if query.trim().chars().count() < self.min_query_len {
            return Some(vec![]);
        }

        let my_generation = {
            let mut generations = self.generations.lock().await;
            // The key space is client-supplied; sweep idle entries so the
            // map stays bounded by recent activity.
            if generations.len() >= SWEEP_THRESHOLD {
                generations.retain(|_, entry| entry.touched.elapsed() < self.idle_ttl);
            }
            let entry = generations
                .entry(key.to_string())
                .or_insert(Generation { counter: 0, touched: Instant::now() });
            entry.counter += 1;
            entry.touched = Instant::now();
            entry.counter
        };

        tokio::time::sleep(self.debounce).await;

        {
            let generations = self.generations.lock().await;
            if generations.get(key).map(|entry| entry.counter) != Some(my_generation) {
                tracing::trace!("Suggestion for {:?} superseded, dropping", key);
                return None;
            }
        }

        Some(self.geocoder.suggest(query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(server: &mockito::ServerGuard, debounce_ms: u64) -> SuggestScheduler {
        let geocoder = Arc::new(GeocoderClient::new(
            format!("{}/geocode/v1/json", server.url()),
            "test_key".to_string(),
            "in".to_string(),
            5,
        ));
        SuggestScheduler::new(geocoder, debounce_ms, 3)
    }

    #[tokio::test]
    async fn short_queries_short_circuit_without_provider_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/geocode/v1/json")
            .match_query(mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let scheduler = scheduler(&server, 1);
        let result = scheduler.suggest("search", "hi").await;
        assert_eq!(result, Some(vec![]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn superseded_call_is_dropped_and_never_fires() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/geocode/v1/json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": [{"formatted": "Pune", "geometry": {"lat": 18.5, "lng": 73.8}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let scheduler = Arc::new(scheduler(&server, 50));

        let stale = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.suggest("search", "pun").await })
        };
        // Let the first call register its generation before superseding it.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let fresh = scheduler.suggest("search", "pune").await;

        assert_eq!(stale.await.unwrap(), None, "stale keystroke must not apply");
        let candidates = fresh.expect("surviving keystroke fires");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].formatted, "Pune");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn independent_keys_do_not_supersede_each_other() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/geocode/v1/json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .expect(2)
            .create_async()
            .await;

        let scheduler = Arc::new(scheduler(&server, 10));
        let a = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.suggest("listing.address", "pune").await })
        };
        let b = scheduler.suggest("seeker.location", "pune").await;

        assert!(a.await.unwrap().is_some());
        assert!(b.is_some());
    }

    #[tokio::test]
    async fn idle_generation_entries_are_swept() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/geocode/v1/json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .expect_at_least(1)
            .create_async()
            .await;

        // debounce 20ms, so entries go idle after 160ms
        let scheduler = Arc::new(scheduler(&server, 20));

        let handles: Vec<_> = (0..(SWEEP_THRESHOLD + 8))
            .map(|i| {
                let scheduler = Arc::clone(&scheduler);
                tokio::spawn(async move { scheduler.suggest(&format!("field-{}", i), "pune").await })
            })
            .collect();
        for handle in handles {
            let _ = handle.await;
        }
        assert!(scheduler.generations.lock().await.len() >= SWEEP_THRESHOLD);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = scheduler.suggest("field-final", "pune").await;

        let tracked = scheduler.generations.lock().await.len();
        assert!(tracked <= 2, "idle entries must be swept, {} still tracked", tracked);
    }
}
