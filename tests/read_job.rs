use async_trait::async_trait;
use paige_turner::domain::models::{Directive, GadgetStatus, OutboundEvent, SessionEvent};
use paige_turner::domain::read_request::ReadState;
use paige_turner::domain::settings::Settings;
use paige_turner::infrastructure::devices::{LoggingActuator, LoggingIndicator};
use paige_turner::infrastructure::emitter::{EmitError, EventSink};
use paige_turner::infrastructure::remote::LocalExecutor;
use paige_turner::Gadget;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

struct ChannelSink(mpsc::UnboundedSender<OutboundEvent>);

#[async_trait]
impl EventSink for ChannelSink {
    async fn send(&self, event: OutboundEvent) -> Result<(), EmitError> {
        self.0.send(event).map_err(|_| EmitError::Closed)
    }
}

fn settings(command: &str, chunk_size: usize) -> Settings {
    let mut settings = Settings::default();
    settings.remote.command = command.to_string();
    settings.remote.timeout_secs = 5;
    settings.reader.chunk_size = chunk_size;
    settings.reader.emit_delay_secs = 0;
    settings.reader.poll_interval_ms = 10;
    settings
}

fn read_directive() -> SessionEvent {
    SessionEvent::Directive(Directive::control(r#"{"type":"read"}"#))
}

async fn next_text(rx: &mut mpsc::UnboundedReceiver<OutboundEvent>) -> Option<String> {
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .ok()??;
    assert_eq!(event.name, "Read");
    Some(event.payload.text)
}

async fn wait_idle(gadget: &Gadget) {
    for _ in 0..500 {
        if gadget.read_state() == ReadState::Idle {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("read job never finished");
}

fn gadget() -> Gadget {
    Gadget::new(
        "PaigeTurner",
        Arc::new(LoggingActuator),
        Arc::new(LoggingIndicator),
    )
}

#[tokio::test]
async fn read_directive_emits_recognized_text() {
    let gadget = gadget();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = gadget.spawn_worker(
        Arc::new(LocalExecutor::new()),
        ChannelSink(tx),
        &settings(r"printf 'Hello\nworld\r\nfoo'", 120),
        shutdown_rx,
    );

    gadget.handle(&SessionEvent::Connected {
        device_addr: "00:11:22:33:44:55".to_string(),
    });
    assert_eq!(gadget.status(), GadgetStatus::Connected);

    gadget.handle(&read_directive());
    assert_eq!(next_text(&mut rx).await.as_deref(), Some("Hello world foo"));
    wait_idle(&gadget).await;

    shutdown_tx.send(true).unwrap();
    worker.await.unwrap();
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn chunks_arrive_in_order() {
    let gadget = gadget();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = gadget.spawn_worker(
        Arc::new(LocalExecutor::new()),
        ChannelSink(tx),
        &settings("echo a b c d e", 2),
        shutdown_rx,
    );

    gadget.handle(&read_directive());
    gadget.handle(&read_directive());

    assert_eq!(next_text(&mut rx).await.as_deref(), Some("a b"));
    assert_eq!(next_text(&mut rx).await.as_deref(), Some("c d"));
    assert_eq!(next_text(&mut rx).await.as_deref(), Some("e"));
    wait_idle(&gadget).await;

    shutdown_tx.send(true).unwrap();
    worker.await.unwrap();
    // The duplicate request merged into the first job
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn failed_command_emits_nothing_and_recovers() {
    let gadget = gadget();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = gadget.spawn_worker(
        Arc::new(LocalExecutor::new()),
        ChannelSink(tx),
        &settings("echo partial; exit 4", 120),
        shutdown_rx,
    );

    gadget.handle(&read_directive());
    tokio::time::sleep(Duration::from_millis(20)).await;
    wait_idle(&gadget).await;
    assert!(rx.try_recv().is_err());

    // A fresh request is accepted again afterwards
    gadget.handle(&read_directive());
    assert_ne!(gadget.read_state(), ReadState::Idle);
    wait_idle(&gadget).await;

    shutdown_tx.send(true).unwrap();
    worker.await.unwrap();
    assert!(rx.try_recv().is_err());
}
