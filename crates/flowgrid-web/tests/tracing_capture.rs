#![cfg(feature = "tracing")]

//! Structured log events emitted across one drag gesture.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use flowgrid_core::{Point, TileId};
use flowgrid_web::{FlowGridConfig, FlowReorder, MemoryBackend};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: Option<String>,
    fields: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: fields.get("message").cloned(),
            fields,
        });
    }
}

fn with_capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let capture = Capture::default();
    let events = Arc::clone(&capture.events);
    let subscriber = tracing_subscriber::registry().with(capture);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn messages(events: &[CapturedEvent]) -> Vec<&str> {
    events.iter().filter_map(|e| e.message.as_deref()).collect()
}

#[test]
fn gesture_logs_rebuild_step_and_commit() {
    let events = with_capture(|| {
        let backend = MemoryBackend::uniform(12, 4, 100.0, 10.0);
        let mut flow =
            FlowReorder::new(backend, (0..12u64).collect(), FlowGridConfig::default()).unwrap();
        flow.attach();
        flow.drag_started(TileId::new(0));
        let pointer = flow.backend().center_of(TileId::new(5)).unwrap();
        flow.drag_moved(TileId::new(0), pointer, Point::new(0.0, 1.0));
        flow.drag_ended(TileId::new(0));
    });

    let messages = messages(&events);
    for expected in [
        "layout cache rebuilt",
        "drag started",
        "reflow step applied",
        "drag committed",
    ] {
        assert!(messages.contains(&expected), "missing {expected:?} in {messages:?}");
    }

    let rebuild = events
        .iter()
        .find(|e| e.message.as_deref() == Some("layout cache rebuilt"))
        .unwrap();
    assert_eq!(rebuild.level, tracing::Level::DEBUG);
    assert_eq!(rebuild.fields.get("tiles").map(String::as_str), Some("12"));
    assert_eq!(rebuild.fields.get("threshold_x").map(String::as_str), Some("430"));

    let step = events
        .iter()
        .find(|e| e.message.as_deref() == Some("reflow step applied"))
        .unwrap();
    assert_eq!(step.fields.get("from").map(String::as_str), Some("0"));
    assert_eq!(step.fields.get("to").map(String::as_str), Some("5"));
}

#[test]
fn ignored_moves_log_reason_at_trace() {
    let events = with_capture(|| {
        let backend = MemoryBackend::uniform(4, 4, 100.0, 10.0);
        let mut flow =
            FlowReorder::new(backend, (0..4u64).collect(), FlowGridConfig::default()).unwrap();
        flow.attach();
        flow.drag_moved(TileId::new(0), Point::new(5.0, 5.0), Point::new(1.0, 0.0));
    });

    let ignored = events
        .iter()
        .find(|e| e.message.as_deref() == Some("drag notification ignored"))
        .expect("ignored move logged");
    assert_eq!(ignored.level, tracing::Level::TRACE);
    assert_eq!(
        ignored.fields.get("reason").map(String::as_str),
        Some("NoActiveDrag")
    );
}
