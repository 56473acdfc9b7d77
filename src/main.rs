use anyhow::Result;
use paige_turner::domain::read_request::ReadState;
use paige_turner::domain::settings::SettingsService;
use paige_turner::infrastructure::console::{self, ConsoleSink};
use paige_turner::infrastructure::devices::{LoggingActuator, LoggingIndicator};
use paige_turner::infrastructure::logging;
use paige_turner::infrastructure::remote::{LocalExecutor, RemoteExecutor, SshExecutor};
use paige_turner::Gadget;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let settings_service = match std::env::args().nth(1) {
        Some(path) => SettingsService::from_path(PathBuf::from(path)),
        None => SettingsService::new()?,
    };
    let settings = settings_service.get().clone();

    let _logging_guard = logging::init_logger(&settings.log_settings)
        .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
        .ok();

    info!(
        settings = %settings_service.path().display(),
        "Starting {}",
        settings.friendly_name
    );

    let executor: Arc<dyn RemoteExecutor> = if settings.remote.use_local_executor {
        info!("Running OCR command locally");
        Arc::new(LocalExecutor::new())
    } else {
        Arc::new(SshExecutor::from_settings(&settings.remote))
    };

    let gadget = Gadget::new(
        settings.friendly_name.clone(),
        Arc::new(LoggingActuator),
        Arc::new(LoggingIndicator),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = gadget.spawn_worker(
        executor,
        ConsoleSink::new(tokio::io::stdout()),
        &settings,
        shutdown_rx,
    );

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        if let Err(e) = console::forward_inbound(BufReader::new(tokio::io::stdin()), event_tx).await
        {
            error!("Console input failed: {}", e);
        }
    });

    let interrupted = loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => gadget.handle(&event),
                None => break false,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break true;
            }
        }
    };

    // Input ended: let a read that was asked for last still be picked up
    if !interrupted {
        while gadget.read_state() == ReadState::Requested {
            tokio::time::sleep(settings.reader.poll_interval()).await;
        }
    }

    info!(status = ?gadget.status(), "Shutting down, waiting for any running read job");
    let _ = shutdown_tx.send(true);
    if let Err(e) = worker.await {
        error!("Read worker panicked: {}", e);
    }

    Ok(())
}
