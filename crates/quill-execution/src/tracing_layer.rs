//! Tracing layer that streams Quill's log events to the host UI.
//!
//! Events emitted by the `quill*` targets are turned into [`ActionEvent`]s
//! and pushed onto an unbounded tokio channel. Everything else is ignored.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Target prefix shared by every Quill crate.
pub const QUILL_TARGET_PREFIX: &str = "quill";

/// Event data sent to the host UI
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActionEvent {
    /// Event target (e.g. "quill::action", "quill_core::swipe::machine")
    pub target: String,
    /// Log level (INFO, DEBUG, WARN, ERROR)
    pub level: String,
    pub message: String,
    /// Structured fields, without `message`
    pub fields: HashMap<String, Value>,
    /// Names of the enclosing spans, outermost first
    pub spans: Vec<String>,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Forwards Quill events to a channel
pub struct ActionEventLayer {
    sender: mpsc::UnboundedSender<ActionEvent>,
}

impl ActionEventLayer {
    pub fn new(sender: mpsc::UnboundedSender<ActionEvent>) -> Self {
        Self { sender }
    }

    /// Creates a layer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ActionEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl<S> Layer<S> for ActionEventLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(QUILL_TARGET_PREFIX) {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let message = match fields.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let spans = ctx
            .event_scope(event)
            .map(|scope| scope.from_root().map(|span| span.name().to_string()).collect())
            .unwrap_or_default();

        let action_event = ActionEvent {
            target: metadata.target().to_string(),
            level: metadata.level().to_string(),
            message,
            fields,
            spans,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // A dropped receiver just means nobody is listening.
        let _ = self.sender.send(action_event);
    }
}

/// Field visitor that extracts tracing event fields into a HashMap
struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}
