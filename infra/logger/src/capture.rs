//! In-memory capture of tracing events.
//!
//! Advisory warnings of the model layer are part of its contract (a rebind warns
//! exactly once, an unhandled event warns and is dropped), so tests need to observe
//! them. [`LogCapture`] records every event it sees, either for a single closure
//! ([`LogCapture::scoped`]) or for the whole process when passed to
//! [`crate::LoggerBuilder::capture`].

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

const MESSAGE_FIELD: &str = "message";

/// One recorded tracing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLog {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

impl CapturedLog {
    /// Value of a structured field, if the event carried it.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Shared buffer of captured events. Clones observe the same buffer.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<CapturedLog>>>,
}

impl LogCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A `tracing-subscriber` layer feeding this buffer.
    #[must_use]
    pub fn layer(&self) -> CaptureLayer {
        CaptureLayer { records: Arc::clone(&self.records) }
    }

    /// Runs `f` with a thread-local subscriber that records into this buffer.
    ///
    /// The global subscriber (if any) is left untouched, which keeps parallel tests
    /// isolated from each other.
    pub fn scoped<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::registry().with(self.layer());
        tracing::subscriber::with_default(subscriber, f)
    }

    #[must_use]
    pub fn records(&self) -> Vec<CapturedLog> {
        self.records.lock().clone()
    }

    /// Number of recorded events at exactly `level`.
    #[must_use]
    pub fn count(&self, level: Level) -> usize {
        self.records.lock().iter().filter(|r| r.level == level).count()
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<CapturedLog> {
        self.records.lock().iter().filter(|r| r.level == Level::WARN).cloned().collect()
    }

    /// Whether an event at `level` has a message containing `needle`.
    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records.lock().iter().any(|r| r.level == level && r.message.contains(needle))
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

/// Layer half of [`LogCapture`].
#[derive(Debug, Clone)]
pub struct CaptureLayer {
    records: Arc<Mutex<Vec<CapturedLog>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let message = visitor.fields.remove(MESSAGE_FIELD).unwrap_or_default();
        self.records.lock().push(CapturedLog {
            level: *metadata.level(),
            target: metadata.target().to_owned(),
            message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: BTreeMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields.insert(field.name().to_owned(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_owned(), value.to_owned());
    }
}
