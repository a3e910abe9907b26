/// Command system for TEA pattern
///
/// Commands are the side effects requested by the update function. The
/// executor runs each one on its own task and feeds the outcome back into
/// the update loop as a message.

use crate::recipients::ingest_file;
use crate::remote::{MailService, SendRequest};
use crate::tea::message::{Message, NotificationMessage, RecipientsMessage, SendMessage};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Side effect requested by an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read a recipient spreadsheet
    IngestFile(PathBuf),

    /// `POST /send-email`
    StartSend(SendRequest),

    /// `POST /stop-email`
    StopSend,

    /// Hide a notification once its window has passed
    DismissNotification { id: Uuid, after: Duration },
}

/// Runs commands against the mail service and the file system
#[derive(Clone)]
pub struct CommandExecutor {
    service: Arc<dyn MailService>,
    sender: mpsc::UnboundedSender<Message>,
}

impl CommandExecutor {
    pub fn new(service: Arc<dyn MailService>, sender: mpsc::UnboundedSender<Message>) -> Self {
        Self { service, sender }
    }

    pub fn service(&self) -> Arc<dyn MailService> {
        Arc::clone(&self.service)
    }

    /// Spawn the command; its result arrives later as a message
    pub fn execute(&self, command: Command) {
        let sender = self.sender.clone();

        match command {
            Command::IngestFile(path) => {
                tokio::spawn(async move {
                    let task_path = path.clone();
                    let result = match tokio::task::spawn_blocking(move || ingest_file(&task_path)).await {
                        Ok(result) => result.map_err(|e| e.to_string()),
                        Err(e) => Err(format!("ingestion task failed: {}", e)),
                    };
                    let _ = sender.send(Message::Recipients(RecipientsMessage::Loaded { path, result }));
                });
            }

            Command::StartSend(request) => {
                let service = self.service();
                tokio::spawn(async move {
                    let message = match service.start_send(&request).await {
                        Ok(()) => SendMessage::Started,
                        Err(e) => SendMessage::StartFailed(e.to_string()),
                    };
                    let _ = sender.send(Message::Send(message));
                });
            }

            Command::StopSend => {
                let service = self.service();
                tokio::spawn(async move {
                    let message = match service.stop_send().await {
                        Ok(()) => SendMessage::Stopped,
                        Err(e) => SendMessage::StopFailed(e.to_string()),
                    };
                    let _ = sender.send(Message::Send(message));
                });
            }

            Command::DismissNotification { id, after } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = sender.send(Message::Notification(NotificationMessage::Expired(id)));
                });
            }
        }
    }
}
