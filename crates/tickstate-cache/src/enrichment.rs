//! Background market-price enrichment.
//!
//! Price lookups are slow, so the tick thread never waits on them. It calls
//! [`PriceEnricher::lookup_or_request`], which answers from the resolved
//! table or queues the id for the worker thread and returns `None`. The
//! worker is the only writer of the table.
//!
//! Clearing bumps a generation counter. Results computed for an older
//! generation are dropped, so a lookup still running across a session reset
//! cannot repopulate the fresh table.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use dashmap::{DashMap, DashSet};
use thiserror::Error;
use tickstate_core::StateError;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// A slow source of market prices.
pub trait PriceSource: Send + Sync {
    /// Current price of an item. `Ok(None)` means the item has no market price.
    fn price(&self, item_id: i32) -> Result<Option<i32>, StateError>;
}

/// Errors from the enrichment worker.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The worker has shut down and no longer accepts work.
    #[error("price worker stopped")]
    WorkerStopped,

    /// The worker thread could not be started.
    #[error("failed to spawn price worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The price source failed.
    #[error(transparent)]
    Source(#[from] StateError),
}

#[derive(Clone, Copy, Debug)]
struct Job {
    item_id: i32,
    generation: u64,
}

/// Non-blocking price table filled by one worker thread.
pub struct PriceEnricher {
    prices: Arc<DashMap<i32, Option<i32>>>,
    in_flight: Arc<DashSet<i32>>,
    generation: Arc<AtomicU64>,
    tx: Option<mpsc::UnboundedSender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl PriceEnricher {
    /// Start the worker thread.
    pub fn spawn(source: Arc<dyn PriceSource>, thread_name: &str) -> Result<Self, EnrichError> {
        let prices = Arc::new(DashMap::new());
        let in_flight = Arc::new(DashSet::new());
        let generation = Arc::new(AtomicU64::new(0));
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = std::thread::Builder::new().name(thread_name.to_string()).spawn({
            let prices = Arc::clone(&prices);
            let in_flight = Arc::clone(&in_flight);
            let generation = Arc::clone(&generation);
            move || run_worker(rx, source.as_ref(), &prices, &in_flight, &generation)
        })?;
        debug!(thread = thread_name, "price worker started");

        Ok(Self {
            prices,
            in_flight,
            generation,
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Resolved price: `Some(Some(p))` priced, `Some(None)` known unpriced,
    /// `None` not resolved yet.
    pub fn lookup(&self, item_id: i32) -> Option<Option<i32>> {
        self.prices.get(&item_id).map(|p| *p)
    }

    /// Queue a lookup. No-op if the id is resolved or already queued.
    pub fn request(&self, item_id: i32) -> Result<(), EnrichError> {
        if self.prices.contains_key(&item_id) || !self.in_flight.insert(item_id) {
            return Ok(());
        }
        let job = Job {
            item_id,
            generation: self.generation.load(Ordering::Acquire),
        };
        let sent = self.tx.as_ref().is_some_and(|tx| tx.send(job).is_ok());
        if sent {
            Ok(())
        } else {
            let _ = self.in_flight.remove(&item_id);
            Err(EnrichError::WorkerStopped)
        }
    }

    /// Price if already known, otherwise queue it and return `None`.
    pub fn lookup_or_request(&self, item_id: i32) -> Option<i32> {
        if let Some(price) = self.lookup(item_id) {
            return price;
        }
        if let Err(error) = self.request(item_id) {
            trace!(item_id, %error, "price request not queued");
        }
        None
    }

    /// Drop every resolved price and forget queued ids.
    pub fn clear(&self) {
        let _ = self.generation.fetch_add(1, Ordering::AcqRel);
        self.prices.clear();
        self.in_flight.clear();
    }

    /// Number of resolved ids.
    pub fn resolved_count(&self) -> usize {
        self.prices.len()
    }

    /// Number of ids queued or being looked up.
    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Stop accepting work and wait for the worker to drain its queue.
    pub fn shutdown(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("price worker exited abnormally");
            }
        }
    }
}

impl Drop for PriceEnricher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PriceEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceEnricher")
            .field("resolved", &self.prices.len())
            .field("in_flight", &self.in_flight.len())
            .field("running", &self.tx.is_some())
            .finish()
    }
}

fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Job>,
    source: &dyn PriceSource,
    prices: &DashMap<i32, Option<i32>>,
    in_flight: &DashSet<i32>,
    generation: &AtomicU64,
) {
    while let Some(job) = rx.blocking_recv() {
        if job.generation != generation.load(Ordering::Acquire) {
            continue;
        }
        let result = catch_unwind(AssertUnwindSafe(|| source.price(job.item_id)))
            .unwrap_or_else(|_| Err(StateError::Internal("price source panicked".into())));

        if job.generation != generation.load(Ordering::Acquire) {
            continue;
        }
        match result {
            Ok(price) => {
                let _ = prices.insert(job.item_id, price);
            }
            Err(error) => {
                let error = EnrichError::from(error);
                trace!(item_id = job.item_id, %error, "price lookup failed");
            }
        }
        let _ = in_flight.remove(&job.item_id);
    }
    debug!("price worker stopped");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct TableSource {
        prices: HashMap<i32, i32>,
        failing: Vec<i32>,
        calls: AtomicUsize,
        gate: Mutex<()>,
    }

    impl PriceSource for TableSource {
        fn price(&self, item_id: i32) -> Result<Option<i32>, StateError> {
            let _open = self.gate.lock();
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&item_id) {
                return Err(StateError::Lookup {
                    kind: "price",
                    id: item_id,
                    message: "rate limited".into(),
                });
            }
            Ok(self.prices.get(&item_id).copied())
        }
    }

    fn source() -> Arc<TableSource> {
        Arc::new(TableSource {
            prices: HashMap::from([(4151, 1_500_000), (995, 1)]),
            failing: vec![666],
            ..TableSource::default()
        })
    }

    fn wait_until(mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() {
            assert!(Instant::now() < deadline, "timed out waiting for worker");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn resolves_in_background() {
        let enricher = PriceEnricher::spawn(source(), "test-prices").unwrap();
        assert_eq!(enricher.lookup_or_request(4151), None);
        wait_until(|| enricher.lookup(4151).is_some());
        assert_eq!(enricher.lookup_or_request(4151), Some(1_500_000));
    }

    #[test]
    fn unpriced_item_resolves_to_none() {
        let enricher = PriceEnricher::spawn(source(), "test-prices").unwrap();
        enricher.request(12).unwrap();
        wait_until(|| enricher.lookup(12).is_some());
        assert_eq!(enricher.lookup(12), Some(None));
        assert_eq!(enricher.lookup_or_request(12), None);
    }

    #[test]
    fn duplicate_requests_coalesce() {
        let source = source();
        let mut enricher =
            PriceEnricher::spawn(Arc::clone(&source) as Arc<dyn PriceSource>, "test-prices").unwrap();
        {
            let _hold = source.gate.lock();
            for _ in 0..5 {
                enricher.request(995).unwrap();
            }
            assert_eq!(enricher.pending_count(), 1);
        }
        wait_until(|| enricher.lookup(995).is_some());
        enricher.request(995).unwrap();
        enricher.shutdown();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_lookup_can_be_retried() {
        let source = source();
        let enricher =
            PriceEnricher::spawn(Arc::clone(&source) as Arc<dyn PriceSource>, "test-prices").unwrap();
        enricher.request(666).unwrap();
        wait_until(|| enricher.pending_count() == 0);
        assert_eq!(enricher.lookup(666), None);
        enricher.request(666).unwrap();
        wait_until(|| source.calls.load(Ordering::SeqCst) == 2);
    }

    #[test]
    fn clear_discards_in_flight_results() {
        let source = source();
        let mut enricher =
            PriceEnricher::spawn(Arc::clone(&source) as Arc<dyn PriceSource>, "test-prices").unwrap();
        {
            let _hold = source.gate.lock();
            enricher.request(4151).unwrap();
            enricher.clear();
            assert_eq!(enricher.pending_count(), 0);
        }
        enricher.shutdown();
        assert_eq!(enricher.lookup(4151), None);
        assert_eq!(enricher.resolved_count(), 0);
    }

    #[test]
    fn request_after_shutdown_fails() {
        let mut enricher = PriceEnricher::spawn(source(), "test-prices").unwrap();
        enricher.shutdown();
        assert_matches!(enricher.request(1), Err(EnrichError::WorkerStopped));
        assert_eq!(enricher.pending_count(), 0);
        assert_eq!(enricher.lookup_or_request(1), None);
    }

    #[test]
    fn worker_thread_is_named() {
        struct NameSource(Mutex<Option<String>>);
        impl PriceSource for NameSource {
            fn price(&self, _: i32) -> Result<Option<i32>, StateError> {
                *self.0.lock() = std::thread::current().name().map(str::to_string);
                Ok(Some(1))
            }
        }
        let source = Arc::new(NameSource(Mutex::new(None)));
        let mut enricher =
            PriceEnricher::spawn(Arc::clone(&source) as Arc<dyn PriceSource>, "price-cache").unwrap();
        enricher.request(1).unwrap();
        enricher.shutdown();
        assert_eq!(source.0.lock().as_deref(), Some("price-cache"));
    }
}
