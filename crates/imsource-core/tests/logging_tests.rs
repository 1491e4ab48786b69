//! Log events emitted around storage

use std::sync::{Arc, Mutex};

use imsource_core::{ImsourceConfig, JsonStorage, ListKind, Logic, MemoryStorage, Storage};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    message: String,
}

#[derive(Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let capture = EventCapture::default();
    let events = Arc::clone(&capture.events);
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(capture);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn has_event(events: &[CapturedEvent], level: Level, message: &str) -> bool {
    events
        .iter()
        .any(|e| e.level == level && e.message.contains(message))
}

#[test]
fn test_missing_data_file_warns() {
    let dir = TempDir::new().unwrap();
    let config = ImsourceConfig {
        data_dir: dir.path().join("data"),
        ..ImsourceConfig::default()
    };
    let storage = JsonStorage::new(&config);

    let events = with_captured_events(|| {
        assert!(storage.load_sources(ListKind::Active).unwrap().is_empty());
    });
    assert!(has_event(&events, Level::WARN, "data file missing"));
}

#[test]
fn test_existing_data_file_does_not_warn() {
    let dir = TempDir::new().unwrap();
    let config = ImsourceConfig {
        data_dir: dir.path().join("data"),
        ..ImsourceConfig::default()
    };
    let mut storage = JsonStorage::new(&config);
    storage.save_sources(ListKind::Active, &[]).unwrap();

    let events = with_captured_events(|| {
        storage.load_sources(ListKind::Active).unwrap();
    });
    assert!(!events.iter().any(|e| e.level == Level::WARN));
}

#[test]
fn test_successful_command_logs_save() {
    let events = with_captured_events(|| {
        let mut logic = Logic::new(MemoryStorage::default());
        logic.execute("add i/Dune y/book a/Frank Herbert").unwrap();
    });
    assert!(has_event(&events, Level::INFO, "state saved"));
}

#[test]
fn test_failed_command_does_not_save() {
    let mut logic = Logic::new(MemoryStorage::default());
    let events = with_captured_events(|| {
        assert!(logic.execute("delete 9").is_err());
    });
    assert!(!has_event(&events, Level::INFO, "state saved"));
}
