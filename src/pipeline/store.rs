//! Single shared view keyed by a monotonically increasing run id

use tokio::sync::watch;
use tracing::debug;

use super::view::{AggregatedWeatherView, Phase};
use crate::models::LocationSelection;
use crate::sources::SourceKind;

/// Holds the latest view. Updates tagged with an older run id are dropped.
#[derive(Debug)]
pub struct ViewStore {
    tx: watch::Sender<AggregatedWeatherView>,
}

impl ViewStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AggregatedWeatherView::idle());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<AggregatedWeatherView> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> AggregatedWeatherView {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn current_run(&self) -> u64 {
        self.tx.borrow().run_id
    }

    /// Start a new run, replacing the view wholesale. Returns the new run id.
    pub fn begin_run(&self, selection: LocationSelection) -> u64 {
        let mut run_id = 0;
        self.tx.send_modify(|view| {
            run_id = view.run_id + 1;
            *view = AggregatedWeatherView::fetching(run_id, selection);
        });
        run_id
    }

    /// Apply `update` if `run_id` is still the current run
    pub fn publish<F>(&self, run_id: u64, kind: SourceKind, update: F) -> bool
    where
        F: FnOnce(&mut AggregatedWeatherView),
    {
        let applied = self.tx.send_if_modified(|view| {
            if view.run_id != run_id {
                return false;
            }
            update(view);
            true
        });

        if !applied {
            debug!(run_id, source = %kind, "Discarding stale result");
        }
        applied
    }

    /// Mark the run settled. A no-op for superseded runs.
    pub fn settle(&self, run_id: u64, banner: Option<String>) -> bool {
        let applied = self.tx.send_if_modified(|view| {
            if view.run_id != run_id {
                return false;
            }
            view.phase = Phase::Settled;
            view.banner = banner;
            true
        });

        if !applied {
            debug!(run_id, "Run superseded before settling");
        }
        applied
    }

    /// Wait until `run_id` has settled or been superseded, then return the latest view
    pub async fn wait_settled(&self, run_id: u64) -> AggregatedWeatherView {
        let mut rx = self.subscribe();
        match rx
            .wait_for(|view| view.run_id != run_id || view.phase == Phase::Settled)
            .await
        {
            Ok(view) => view.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use crate::pipeline::view::SourceResult;

    fn selection(lat: f64) -> LocationSelection {
        LocationSelection::map_click(Coordinate::new(lat, 0.0).unwrap())
    }

    #[test]
    fn test_run_ids_increase() {
        let store = ViewStore::new();
        assert_eq!(store.current_run(), 0);
        assert_eq!(store.begin_run(selection(1.0)), 1);
        assert_eq!(store.begin_run(selection(2.0)), 2);
        assert_eq!(store.snapshot().phase, Phase::Fetching);
    }

    #[test]
    fn test_stale_publish_is_discarded() {
        let store = ViewStore::new();
        let first = store.begin_run(selection(1.0));
        let second = store.begin_run(selection(2.0));

        let applied = store.publish(first, SourceKind::Events, |view| {
            view.events = SourceResult::Failed("late".to_string());
        });
        assert!(!applied);
        assert_eq!(store.snapshot().events, SourceResult::Pending);

        assert!(!store.settle(first, None));
        assert!(store.settle(second, None));
        assert_eq!(store.snapshot().phase, Phase::Settled);
    }

    #[test]
    fn test_new_run_clears_previous_values() {
        let store = ViewStore::new();
        let first = store.begin_run(selection(1.0));
        store.publish(first, SourceKind::Geocode, |view| view.failures = 3);
        store.begin_run(selection(2.0));
        assert_eq!(store.snapshot().failures, 0);
    }

    #[tokio::test]
    async fn test_wait_settled_returns_on_supersede() {
        let store = ViewStore::new();
        let first = store.begin_run(selection(1.0));
        store.begin_run(selection(2.0));
        let view = store.wait_settled(first).await;
        assert_eq!(view.run_id, 2);
    }
}
