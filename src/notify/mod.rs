//! Operator notifications and the durable announced status.
//!
//! The gate remembers which status was last announced so each DOWN/UP
//! transition reaches the operator once. Every failure here is absorbed:
//! unreadable state counts as UP, and failed deliveries or writes come back
//! as `false`.

mod error;
pub mod message;
mod status;
mod store;
mod telegram;

pub use error::{NotifyError, StoreError};
pub use status::AnnouncedStatus;
pub use store::{FileStatusStore, MemoryStatusStore, StatusStore};
pub use telegram::{DisabledNotifier, TelegramNotifier};

use crate::config::{NotifyConfig, StoreConfig};
use crate::metrics::NOTIFICATIONS_TOTAL;
use crate::reading::Reading;
use async_trait::async_trait;
use std::sync::Arc;

/// Delivers a formatted message to the operator channel.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Returns the channel's acknowledgement flag.
    async fn send(&self, text: &str) -> Result<bool, NotifyError>;
}

/// Announced-status persistence plus message dispatch.
pub struct NotificationGate {
    store: Arc<dyn StatusStore>,
    notifier: Arc<dyn Notifier>,
    key: String,
}

impl NotificationGate {
    pub fn new(
        store: Arc<dyn StatusStore>,
        notifier: Arc<dyn Notifier>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            key: key.into(),
        }
    }

    /// Build the file-backed store and Telegram channel described by config.
    pub fn from_config(store: &StoreConfig, notify: &NotifyConfig) -> Result<Self, NotifyError> {
        let status_store: Arc<dyn StatusStore> = match &store.path {
            Some(path) => Arc::new(FileStatusStore::new(path)),
            None => {
                tracing::warn!("No status store path configured, announced status will not survive restarts");
                Arc::new(MemoryStatusStore::default())
            }
        };

        let notifier: Arc<dyn Notifier> = if notify.enabled {
            Arc::new(TelegramNotifier::from_config(notify)?)
        } else {
            tracing::info!("Operator notifications disabled");
            Arc::new(DisabledNotifier)
        };

        Ok(Self::new(status_store, notifier, store.key.clone()))
    }

    /// Status last announced to the operator.
    ///
    /// A missing key is the initial state and reads as a fresh UP. Store
    /// failures and unknown values degrade to UP, which at worst repeats a
    /// DOWN alert rather than swallowing one.
    pub async fn last_status(&self) -> Reading<AnnouncedStatus> {
        match self.store.get(&self.key).await {
            Ok(None) => Reading::Fresh(AnnouncedStatus::Up),
            Ok(Some(raw)) => match raw.parse() {
                Ok(status) => Reading::Fresh(status),
                Err(reason) => {
                    tracing::warn!(value = %raw, "Unrecognised announced status, assuming UP");
                    Reading::Degraded {
                        value: AnnouncedStatus::Up,
                        reason,
                    }
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read announced status, assuming UP");
                Reading::Degraded {
                    value: AnnouncedStatus::Up,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Persist the announced status. Failures are logged, not retried.
    pub async fn set_last_status(&self, status: AnnouncedStatus) -> bool {
        match self.store.put(&self.key, status.as_str()).await {
            Ok(()) => {
                tracing::debug!(status = %status, "Announced status persisted");
                true
            }
            Err(e) => {
                tracing::warn!(status = %status, error = %e, "Failed to persist announced status");
                false
            }
        }
    }

    /// Send a message; true only when the channel acknowledged it.
    pub async fn notify(&self, message: &str) -> bool {
        let delivered = match self.notifier.send(message).await {
            Ok(ack) => ack,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send operator notification");
                false
            }
        };

        metrics::counter!(NOTIFICATIONS_TOTAL, "delivered" => delivered.to_string()).increment(1);
        delivered
    }
}
