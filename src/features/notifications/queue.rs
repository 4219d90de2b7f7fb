//! Fire-and-forget delivery of report change notices.
//!
//! Request handlers enqueue; a single background worker drains the bounded
//! channel and talks to the dispatcher, so a slow or failing notification
//! backend never delays or fails an edit.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::features::notifications::dispatcher::NotificationDispatcher;
use crate::features::notifications::models::ReportUpdatedNotice;

/// Sending half, cheap to clone into every service that emits notices
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<ReportUpdatedNotice>,
}

impl NotificationQueue {
    /// Create a queue holding at most `capacity` undelivered notices
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ReportUpdatedNotice>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Queue a notice for delivery. Returns false (after logging) when the
    /// queue is full or the worker has stopped.
    pub fn enqueue(&self, notice: ReportUpdatedNotice) -> bool {
        match self.sender.try_send(notice) {
            Ok(()) => true,
            Err(TrySendError::Full(notice)) => {
                tracing::warn!(
                    "Notification queue full, dropping notice for report {}",
                    notice.report_id
                );
                false
            }
            Err(TrySendError::Closed(notice)) => {
                tracing::error!(
                    "Notification worker stopped, dropping notice for report {}",
                    notice.report_id
                );
                false
            }
        }
    }
}

/// Background consumer of the notification queue
pub struct NotificationWorker {
    receiver: mpsc::Receiver<ReportUpdatedNotice>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl NotificationWorker {
    pub fn new(
        receiver: mpsc::Receiver<ReportUpdatedNotice>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            receiver,
            dispatcher,
        }
    }

    /// Run until every queue handle has been dropped
    pub async fn run(mut self) {
        tracing::info!("Notification worker started");

        while let Some(notice) = self.receiver.recv().await {
            match self.dispatcher.notify_report_updated(&notice).await {
                Ok(()) => tracing::info!(
                    report_id = %notice.report_id,
                    recipient = %notice.recipient_user_id,
                    "Report update notification sent"
                ),
                Err(e) => tracing::warn!(
                    report_id = %notice.report_id,
                    recipient = %notice.recipient_user_id,
                    "Report update notification failed: {}",
                    e
                ),
            }
        }

        tracing::info!("Notification worker stopped");
    }
}
