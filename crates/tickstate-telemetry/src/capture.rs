//! Log capture for tests.
//!
//! [`capture_logs`] installs a thread-local subscriber that keeps every event
//! in memory. Rebuild and tick events carry `family`, `tick` and
//! `elapsed_us` fields; [`CapturedEvent`] reads those back typed so tests can
//! assert on which family logged what.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// One logged event.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// Severity.
    pub level: Level,
    /// Emitting module path.
    pub target: String,
    /// Message text.
    pub message: String,
    /// Structured fields, rendered as text.
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    /// A field as text.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Snapshot family the event is about.
    pub fn family(&self) -> Option<&str> {
        self.field("family")
    }

    /// Tick the event was logged at.
    pub fn tick(&self) -> Option<u64> {
        self.field("tick")?.parse().ok()
    }

    /// Measured duration in microseconds.
    pub fn elapsed_us(&self) -> Option<u64> {
        self.field("elapsed_us")?.parse().ok()
    }
}

/// Events captured so far. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    /// Copy of every event in emission order.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// First event whose message contains `text`.
    pub fn find(&self, text: &str) -> Option<CapturedEvent> {
        self.events
            .lock()
            .iter()
            .find(|e| e.message.contains(text))
            .cloned()
    }

    /// Whether some event's message contains `text`.
    pub fn has_message(&self, text: &str) -> bool {
        self.count_matching(text) > 0
    }

    /// How many messages contain `text`.
    pub fn count_matching(&self, text: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.message.contains(text))
            .count()
    }

    /// Events tagged with a snapshot family.
    pub fn for_family(&self, family: &str) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.family() == Some(family))
            .cloned()
            .collect()
    }

    /// Events at WARN or above.
    pub fn warnings(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.level <= Level::WARN)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
struct Fields {
    message: String,
    rest: BTreeMap<String, String>,
}

impl Fields {
    fn put(&mut self, field: &Field, text: String) {
        if field.name() == "message" {
            self.message = text;
        } else {
            let _ = self.rest.insert(field.name().to_owned(), text);
        }
    }
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }
}

struct Recorder(CapturedLogs);

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let meta = event.metadata();
        self.0.events.lock().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_owned(),
            message: fields.message,
            fields: fields.rest,
        });
    }
}

/// Capture every event on this thread until the guard drops.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let guard = tracing_subscriber::registry()
        .with(Recorder(logs.clone()))
        .with(LevelFilter::TRACE)
        .set_default();
    (logs, guard)
}
