use crate::domain::models::GadgetStatus;
use crate::infrastructure::devices::StatusIndicator;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Connection Lifecycle Hooks
///
/// Tracks whether the Echo device is connected and drives the indicator on
/// every transition.
pub struct ConnectionHooks {
    friendly_name: String,
    status: watch::Sender<GadgetStatus>,
    indicator: Arc<dyn StatusIndicator>,
}

impl ConnectionHooks {
    pub fn new(friendly_name: impl Into<String>, indicator: Arc<dyn StatusIndicator>) -> Self {
        let (status, _) = watch::channel(GadgetStatus::Disconnected);
        Self {
            friendly_name: friendly_name.into(),
            status,
            indicator,
        }
    }

    pub fn on_connected(&self, device_addr: &str) {
        self.set(GadgetStatus::Connected);
        info!("{} connected to Echo device {}", self.friendly_name, device_addr);
    }

    pub fn on_disconnected(&self, device_addr: &str) {
        self.set(GadgetStatus::Disconnected);
        info!(
            "{} disconnected from Echo device {}",
            self.friendly_name, device_addr
        );
    }

    pub fn status(&self) -> GadgetStatus {
        *self.status.borrow()
    }

    fn set(&self, status: GadgetStatus) {
        self.status.send_replace(status);
        self.indicator.show(status);
    }
}
