use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{info, warn};

use crate::errors::ServiceError;

/// Lifecycle notifications published after a warehouse transaction commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    WarehouseCreated {
        business_unit_code: String,
        location: String,
    },
    WarehouseArchived {
        business_unit_code: String,
    },
    WarehouseReplaced {
        business_unit_code: String,
        previous_location: String,
        location: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, waiting for channel capacity
    pub async fn send(&self, event: Event) -> Result<(), ServiceError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| ServiceError::EventError(format!("Failed to send event: {}", e)))
    }

    /// Delivers an event whose state change is already committed without waiting;
    /// a full or closed channel drops it with a warning.
    pub async fn publish(&self, event: Event) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(?event, "Event channel full, lifecycle event dropped");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(?event, "Event channel closed, lifecycle event dropped");
            }
        }
    }
}

/// Creates a bounded channel and the sender half wrapped for commands.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (EventSender::new(tx), rx)
}

pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::WarehouseCreated {
                business_unit_code,
                location,
            } => {
                info!(%business_unit_code, %location, "Warehouse created");
            }
            Event::WarehouseArchived { business_unit_code } => {
                info!(%business_unit_code, "Warehouse archived");
            }
            Event::WarehouseReplaced {
                business_unit_code,
                previous_location,
                location,
            } => {
                info!(
                    %business_unit_code,
                    %previous_location,
                    %location,
                    "Warehouse replaced"
                );
            }
        }
    }

    warn!("Event processing loop has ended");
}
