/// Update function for TEA pattern
///
/// Every state change of the composer happens here. The function is pure:
/// it takes the current model and a message and returns the next model
/// together with the side effects to run.

use crate::remote::{SendRequest, SendStatus};
use crate::tea::message::{
    Field, Message, NotificationLevel, NotificationMessage, RecipientsMessage, SendMessage,
    UIMessage,
};
use crate::tea::model::{Model, Notification, SessionState};
use crate::tea::{Command, UpdateResult};
use std::path::Path;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const MSG_SENDING: &str = "Emails are being sent.";
pub const MSG_SEND_FAILED: &str = "Failed to start email sending.";
pub const MSG_STOPPED: &str = "Email sending process stopped.";

/// Main update function that processes messages and returns updated model with commands
pub fn update(model: Model, message: Message) -> UpdateResult<Model> {
    match message {
        Message::UI(msg) => update_ui(model, msg),
        Message::Recipients(msg) => update_recipients(model, msg),
        Message::Send(msg) => update_send(model, msg),
        Message::Notification(msg) => update_notification(model, msg),
    }
}

/// Handle form editing
fn update_ui(mut model: Model, message: UIMessage) -> UpdateResult<Model> {
    match message {
        UIMessage::FocusNext => {
            leave_field(&mut model);
            model.focus = model.focus.next();
        }

        UIMessage::FocusPrevious => {
            leave_field(&mut model);
            model.focus = model.focus.previous();
        }

        UIMessage::InsertChar(c) => match model.focus {
            Field::Sender => model.draft.sender.push(c),
            Field::Password => model.draft.credential.push(c),
            Field::Subject => model.draft.subject.push(c),
            Field::RecipientsFile => model.file_input.push(c),
            Field::Body => model.body_editor.push(c),
        },

        UIMessage::Backspace => {
            match model.focus {
                Field::Sender => model.draft.sender.pop(),
                Field::Password => model.draft.credential.pop(),
                Field::Subject => model.draft.subject.pop(),
                Field::RecipientsFile => model.file_input.pop(),
                Field::Body => model.body_editor.pop(),
            };
        }

        UIMessage::Quit => {
            model.should_quit = true;
        }
    }

    UpdateResult::just_model(model)
}

/// Body edits reach the draft only when focus leaves the editor
fn leave_field(model: &mut Model) {
    if model.focus == Field::Body {
        model.commit_body();
    }
}

/// Handle recipient ingestion
fn update_recipients(mut model: Model, message: RecipientsMessage) -> UpdateResult<Model> {
    match message {
        RecipientsMessage::Load(path) => {
            debug!("Loading recipients from {}", path.display());
            UpdateResult::with_command(model, Command::IngestFile(path))
        }

        RecipientsMessage::Loaded { path, result } => match result {
            Ok(list) => {
                info!("Recipient list replaced with {} entries", list.len());
                model.status = SendStatus::fresh(list.len());
                model.recipients = list;
                model.all_sent = false;
                if model.session == SessionState::Completed {
                    model.session = SessionState::Idle;
                }

                let text = format!("Loaded {} recipients.", model.recipients.len());
                let command = notify(&mut model, text, NotificationLevel::Info);
                UpdateResult::with_command(model, command)
            }
            Err(e) => {
                error!("Failed to read recipients from {}: {}", path.display(), e);
                let text = format!("Could not read {}: {}", display_name(&path), e);
                let command = notify(&mut model, text, NotificationLevel::Error);
                UpdateResult::with_command(model, command)
            }
        },
    }
}

/// Handle the send session lifecycle
fn update_send(mut model: Model, message: SendMessage) -> UpdateResult<Model> {
    match message {
        SendMessage::Start => {
            if model.is_sending() {
                debug!("Send already in progress, ignoring start");
                return UpdateResult::just_model(model);
            }

            model.commit_body();
            model.session = SessionState::Starting;
            model.all_sent = false;

            let request = SendRequest::new(&model.draft, &model.recipients);
            UpdateResult::with_command(model, Command::StartSend(request))
        }

        SendMessage::Started => {
            if model.session == SessionState::Starting {
                model.session = SessionState::Sending;
            }
            let command = notify(&mut model, MSG_SENDING, NotificationLevel::Success);
            UpdateResult::with_command(model, command)
        }

        SendMessage::StartFailed(e) => {
            error!("Error sending emails: {}", e);
            if model.is_sending() {
                model.session = SessionState::Idle;
            }
            let command = notify(&mut model, MSG_SEND_FAILED, NotificationLevel::Error);
            UpdateResult::with_command(model, command)
        }

        SendMessage::Stop => {
            if !model.is_sending() {
                debug!("Nothing is being sent, ignoring stop");
                return UpdateResult::just_model(model);
            }
            UpdateResult::with_command(model, Command::StopSend)
        }

        SendMessage::Stopped => {
            if model.is_sending() {
                model.session = SessionState::Idle;
            }
            let command = notify(&mut model, MSG_STOPPED, NotificationLevel::Info);
            UpdateResult::with_command(model, command)
        }

        SendMessage::StopFailed(e) => {
            error!("Error stopping email process: {}", e);
            UpdateResult::just_model(model)
        }

        SendMessage::StatusPolled(Ok(status)) => {
            model.status = status;
            if status.all_emails_sent {
                model.all_sent = true;
                if model.is_sending() {
                    info!("All {} emails processed", status.total);
                    model.session = SessionState::Completed;
                }
            }
            UpdateResult::just_model(model)
        }

        SendMessage::StatusPolled(Err(e)) => {
            warn!("Error polling email status: {}", e);
            UpdateResult::just_model(model)
        }
    }
}

/// Handle notification display and expiry
fn update_notification(mut model: Model, message: NotificationMessage) -> UpdateResult<Model> {
    match message {
        NotificationMessage::Show(text, level) => {
            let command = notify(&mut model, text, level);
            UpdateResult::with_command(model, command)
        }

        NotificationMessage::Expired(id) => {
            // A newer notification has its own timer
            if model.notification.as_ref().is_some_and(|n| n.id == id) {
                model.notification = None;
            }
            UpdateResult::just_model(model)
        }
    }
}

/// Replace the visible notification and schedule its dismissal
fn notify<S: Into<String>>(model: &mut Model, text: S, level: NotificationLevel) -> Command {
    let id = Uuid::new_v4();
    model.notification = Some(Notification {
        id,
        message: text.into(),
        level,
    });
    Command::DismissNotification {
        id,
        after: model.notification_duration,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
