// src/services/notification_channel.rs
//
// Notification Channel - transient user messages
//
// Fire-and-forget: `notify` never blocks and never touches the session.
// Notifications expire on their own after the display duration; several may
// be visible at once and no ordering is promised.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::events::{EventBus, NotificationRaised};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

pub struct NotificationChannel {
    event_bus: Arc<EventBus>,
    display_duration: Duration,
    visible: Mutex<Vec<Notification>>,
}

impl NotificationChannel {
    pub fn new(event_bus: Arc<EventBus>, display_duration: Duration) -> Self {
        Self {
            event_bus,
            display_duration,
            visible: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.visible.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show `message` for the display duration
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> Uuid {
        let message = message.into();
        let now = Instant::now();
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.clone(),
            kind,
            expires_at: now + self.display_duration,
        };
        let id = notification.id;

        {
            let mut visible = self.lock();
            visible.retain(|n| n.expires_at > now);
            visible.push(notification);
        }

        match kind {
            NotificationKind::Info => log::info!("{}", message),
            NotificationKind::Error => log::warn!("{}", message),
        }
        self.event_bus.emit(NotificationRaised::new(message, kind));
        id
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.notify(message, NotificationKind::Info)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.notify(message, NotificationKind::Error)
    }

    /// Notifications that have not yet expired, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut visible = self.lock();
        visible.retain(|n| n.expires_at > now);
        visible.clone()
    }

    pub fn display_duration(&self) -> Duration {
        self.display_duration
    }
}
