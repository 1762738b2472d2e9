//! Bounded queue between workflows and the mail dispatcher.

use super::{ConfirmationEmail, MailDispatcher};
use rolodex_core::{RolodexError, RolodexResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Sending half of the mail queue.
///
/// Cloning is cheap; every clone feeds the same worker.
#[derive(Clone, Debug)]
pub struct MailOutbox {
    sender: mpsc::Sender<ConfirmationEmail>,
}

/// Receiving half of the mail queue, drained by [`MailWorker::run`].
pub struct MailWorker {
    receiver: mpsc::Receiver<ConfirmationEmail>,
    dispatcher: Arc<dyn MailDispatcher>,
}

impl MailOutbox {
    /// Creates a queue holding at most `capacity` pending messages.
    pub fn new(capacity: usize, dispatcher: Arc<dyn MailDispatcher>) -> (Self, MailWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, MailWorker { receiver, dispatcher })
    }

    /// Creates the queue and spawns its worker on the current runtime.
    pub fn spawn(capacity: usize, dispatcher: Arc<dyn MailDispatcher>) -> (Self, JoinHandle<()>) {
        let (outbox, worker) = Self::new(capacity, dispatcher);
        (outbox, tokio::spawn(worker.run()))
    }

    /// Queues a confirmation email without waiting for delivery.
    ///
    /// Fails only if the queue is full or the worker has stopped.
    pub fn enqueue(&self, email: ConfirmationEmail) -> RolodexResult<()> {
        self.sender.try_send(email).map_err(|e| {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "mail queue is full",
                mpsc::error::TrySendError::Closed(_) => "mail worker has stopped",
            };
            RolodexError::ExternalService {
                service: "mail".to_string(),
                message: reason.to_string(),
            }
        })?;
        debug!("Confirmation email queued");
        Ok(())
    }
}

impl MailWorker {
    /// Delivers queued messages until every [`MailOutbox`] is dropped.
    pub async fn run(mut self) {
        info!("Mail worker started");
        while let Some(email) = self.receiver.recv().await {
            match self.dispatcher.send_confirmation(&email).await {
                Ok(()) => info!(to = %email.to, "Confirmation email sent"),
                Err(e) => error!(to = %email.to, "Failed to send confirmation email: {}", e),
            }
        }
        info!("Mail worker stopped");
    }
}
