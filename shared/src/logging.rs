//! Logging setup shared by the terminal and web front ends
//!
//! Every event emitted through the `process_*!` macros carries the process
//! that produced it. Output goes to stderr; an optional endpoint also receives
//! those events in JSON batches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

use crate::types::ProcessId;

const DEFAULT_BATCH_SIZE: usize = 5;
const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(500);

/// Where shipped events are POSTed, and how often
#[derive(Debug, Clone)]
pub struct TracingEndpoint {
    pub url: String,
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl TracingEndpoint {
    pub fn new(url: String) -> Self {
        Self {
            url,
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TraceEvent {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub target: String,
    pub message: String,
    pub process: String,
    pub fields: Map<String, Value>,
}

/// Events waiting to be shipped; full once `capacity` is reached
#[derive(Debug)]
struct TraceBatch {
    events: Vec<TraceEvent>,
    capacity: usize,
}

impl TraceBatch {
    fn new(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns true when the batch should be flushed
    fn push(&mut self, event: TraceEvent) -> bool {
        self.events.push(event);
        self.events.len() >= self.capacity
    }

    fn take(&mut self) -> Option<Vec<TraceEvent>> {
        if self.events.is_empty() {
            None
        } else {
            Some(std::mem::replace(&mut self.events, Vec::with_capacity(self.capacity)))
        }
    }
}

/// `tracing` layer forwarding process-tagged events to a [`TracingEndpoint`]
pub struct HttpTracingLayer {
    sender: mpsc::UnboundedSender<TraceEvent>,
}

impl HttpTracingLayer {
    /// Spawns the shipping task, so a tokio runtime must be running
    pub fn new(endpoint: TracingEndpoint) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(ship_events(endpoint, receiver));
        Self { sender }
    }
}

async fn ship_events(endpoint: TracingEndpoint, mut receiver: mpsc::UnboundedReceiver<TraceEvent>) {
    let client = reqwest::Client::new();
    let mut batch = TraceBatch::new(endpoint.batch_size);
    let mut ticker = tokio::time::interval(endpoint.flush_interval);

    loop {
        let ready = tokio::select! {
            received = receiver.recv() => match received {
                Some(event) => batch.push(event),
                None => break,
            },
            _ = ticker.tick() => true,
        };

        if ready {
            if let Some(events) = batch.take() {
                post_batch(&client, &endpoint.url, &events).await;
            }
        }
    }

    if let Some(events) = batch.take() {
        post_batch(&client, &endpoint.url, &events).await;
    }
}

async fn post_batch(client: &reqwest::Client, url: &str, events: &[TraceEvent]) {
    // Logging through tracing here would feed back into this layer
    match client.post(url).json(events).send().await {
        Ok(response) if !response.status().is_success() => {
            eprintln!("trace shipping to {url} rejected: HTTP {}", response.status());
        }
        Ok(_) => {}
        Err(e) => eprintln!("trace shipping to {url} failed: {e}"),
    }
}

impl<S> Layer<S> for HttpTracingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        if !collector.fields.contains_key("process") {
            return;
        }

        let metadata = event.metadata();
        let _ = self.sender.send(TraceEvent {
            timestamp: Utc::now(),
            level: metadata.level().to_string(),
            target: metadata.target().to_string(),
            message: collector.message,
            process: ProcessId::current().to_string(),
            fields: collector.fields,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Map<String, Value>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: Value) {
        match (field.name(), value) {
            ("message", Value::String(text)) => self.message.push_str(&text),
            (name, value) => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}

/// Filter directive scoping `base_level` to this workspace's crates
pub fn filter_directive(process_id: &ProcessId, base_level: &str) -> String {
    match process_id {
        ProcessId::WebServer => format!(
            "webserver={base_level},queue={base_level},shared={base_level},tower_http=debug,axum={base_level}"
        ),
        ProcessId::Terminal => format!("queue={base_level},shared={base_level}"),
        ProcessId::Library => base_level.to_string(),
    }
}

/// Install the global subscriber for the current [`ProcessId`]
///
/// Writes to stderr so the terminal front end keeps stdout for its own output.
pub fn init_tracing_with_endpoint_and_level(endpoint: Option<TracingEndpoint>, log_level: Option<&str>) {
    let directive = filter_directive(ProcessId::current(), log_level.unwrap_or("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(endpoint.is_some())
        .compact();

    let shipping_layer = endpoint.map(|endpoint| {
        eprintln!("📡 Shipping traces to {}", endpoint.url);
        HttpTracingLayer::new(endpoint)
    });

    tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(shipping_layer)
        .with(stderr_layer)
        .init();
}

/// Wall-clock time of day, millisecond precision
pub fn format_timestamp() -> String {
    Utc::now().format("%H:%M:%S%.3f").to_string()
}

#[doc(hidden)]
#[macro_export]
macro_rules! __process_event {
    ($level:ident, $process_id:expr, $($arg:tt)*) => {
        tracing::$level!(
            process = %$process_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        )
    };
}

/// `info` event tagged with the emitting process
#[macro_export]
macro_rules! process_info {
    ($process_id:expr, $($arg:tt)*) => {
        $crate::__process_event!(info, $process_id, $($arg)*);
    };
}

#[macro_export]
macro_rules! process_warn {
    ($process_id:expr, $($arg:tt)*) => {
        $crate::__process_event!(warn, $process_id, $($arg)*);
    };
}

#[macro_export]
macro_rules! process_error {
    ($process_id:expr, $($arg:tt)*) => {
        $crate::__process_event!(error, $process_id, $($arg)*);
    };
}

#[macro_export]
macro_rules! process_debug {
    ($process_id:expr, $($arg:tt)*) => {
        $crate::__process_event!(debug, $process_id, $($arg)*);
    };
}

pub fn log_startup(process_id: &ProcessId, details: &str) {
    crate::process_info!(process_id, "🚀 Starting {}", details);
}

pub fn log_shutdown(process_id: &ProcessId, reason: &str) {
    crate::process_info!(process_id, "🛑 Shutting down: {}", reason);
}

pub fn log_error(process_id: &ProcessId, context: &str, error: &dyn std::fmt::Display) {
    crate::process_error!(process_id, error = %error, "❌ {} failed: {}", context, error);
}

pub fn log_success(process_id: &ProcessId, message: &str) {
    crate::process_info!(process_id, "✅ {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(message: &str) -> TraceEvent {
        TraceEvent {
            timestamp: Utc::now(),
            level: "INFO".to_string(),
            target: "queue".to_string(),
            message: message.to_string(),
            process: ProcessId::WebServer.to_string(),
            fields: Map::new(),
        }
    }

    #[test]
    fn test_filter_directive_per_process() {
        let web = filter_directive(&ProcessId::WebServer, "debug");
        assert!(web.starts_with("webserver=debug,queue=debug"));

        let terminal = filter_directive(&ProcessId::Terminal, "warn");
        assert_eq!(terminal, "queue=warn,shared=warn");

        assert_eq!(filter_directive(&ProcessId::Library, "info"), "info");
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = format_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(stamp.len(), 12);
        assert_eq!(&stamp[2..3], ":");
        assert_eq!(&stamp[8..9], ".");
    }

    #[test]
    fn test_batch_fills_and_drains() {
        let mut batch = TraceBatch::new(2);
        assert!(batch.take().is_none());

        assert!(!batch.push(event("one")));
        assert!(batch.push(event("two")));

        let drained = batch.take().unwrap();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].message, "two");
        assert!(batch.take().is_none());
    }

    #[test]
    fn test_endpoint_batch_size_is_at_least_one() {
        let endpoint = TracingEndpoint::new("http://localhost:9000/traces".to_string()).with_batch_size(0);
        assert_eq!(endpoint.batch_size, 1);
        assert_eq!(endpoint.flush_interval, DEFAULT_FLUSH_INTERVAL);
    }

    #[test]
    fn test_trace_event_serializes() {
        let mut shipped = event("generation applied");
        shipped.fields.insert("generation".to_string(), Value::from(3));

        let json = serde_json::to_value(&shipped).unwrap();
        assert_eq!(json["process"], "webserver");
        assert_eq!(json["fields"]["generation"], 3);
    }
}
