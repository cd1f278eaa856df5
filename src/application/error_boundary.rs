// src/application/error_boundary.rs
//
// Last-resort error boundary
//
// Catches what the typed error paths did not: panics and failed background
// tasks. It logs the fault and raises one generic notification. It never
// touches the session; typed failures are handled by the controller.

use std::fmt::Display;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::services::notification_channel::NotificationChannel;

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

pub struct ErrorBoundary {
    notifications: Arc<NotificationChannel>,
}

impl ErrorBoundary {
    pub fn new(notifications: Arc<NotificationChannel>) -> Self {
        Self { notifications }
    }

    /// Log an unexpected fault and tell the user something went wrong
    pub fn report(&self, context: &str, fault: &dyn Display) {
        log::error!("Unexpected error in {}: {}", context, fault);
        self.notifications.error(UNEXPECTED_ERROR_MESSAGE);
    }

    /// Route panics on any thread through `report`, after the previous hook
    pub fn install_panic_hook(self: Arc<Self>) {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            previous(info);
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown location".to_string());
            self.report(&location, &panic_message(info.payload()));
        }));
    }

    /// Await a background task, reporting it if it panicked or was cancelled
    pub async fn contain<T>(&self, task: JoinHandle<T>) -> Option<T> {
        match task.await {
            Ok(value) => Some(value),
            Err(e) => {
                self.report("background task", &e);
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventBus, NotificationRaised};
    use crate::services::notification_channel::NotificationKind;
    use std::sync::Mutex;
    use std::time::Duration;

    fn boundary() -> (Arc<EventBus>, Arc<NotificationChannel>, ErrorBoundary) {
        let bus = Arc::new(EventBus::new());
        let channel = Arc::new(NotificationChannel::new(
            Arc::clone(&bus),
            Duration::from_secs(3),
        ));
        let boundary = ErrorBoundary::new(Arc::clone(&channel));
        (bus, channel, boundary)
    }

    #[tokio::test]
    async fn test_report_raises_generic_error_notification() {
        let (bus, channel, boundary) = boundary();
        let raised = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&raised);
        bus.subscribe::<NotificationRaised, _>(move |e| {
            sink.lock().unwrap().push((e.message.clone(), e.kind))
        });

        boundary.report("test", &"boom");

        assert_eq!(
            *raised.lock().unwrap(),
            vec![(UNEXPECTED_ERROR_MESSAGE.to_string(), NotificationKind::Error)]
        );
        assert_eq!(channel.active().len(), 1);
    }

    #[tokio::test]
    async fn test_contain_passes_values_through() {
        let (_bus, channel, boundary) = boundary();
        let value = boundary.contain(tokio::spawn(async { 7 })).await;
        assert_eq!(value, Some(7));
        assert!(channel.active().is_empty());
    }

    #[tokio::test]
    async fn test_contain_reports_panicked_task() {
        let (_bus, channel, boundary) = boundary();
        let task = tokio::spawn(async {
            panic!("worker exploded");
        });

        let value: Option<()> = boundary.contain(task).await;

        assert_eq!(value, None);
        let active = channel.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "non-string panic payload");
    }
}
