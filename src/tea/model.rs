/// Composer model following TEA pattern
///
/// Holds the whole view state in one value. Only the update function
/// produces a new model.

use crate::credentials::Credential;
use crate::recipients::RecipientList;
use crate::remote::SendStatus;
use crate::tea::message::{Field, NotificationLevel};
use std::time::Duration;
use uuid::Uuid;

/// Default visibility window for a notification
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(2000);

/// The composition being edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub sender: String,
    pub credential: Credential,
    pub subject: String,
    /// HTML body
    pub body: String,
}

/// Where the current send session stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing in flight
    #[default]
    Idle,
    /// Send request dispatched, outcome unknown
    Starting,
    /// Service accepted the request
    Sending,
    /// Service reported every recipient processed
    Completed,
}

impl SessionState {
    /// True while the send control is disabled and stop is enabled
    pub fn is_sending(self) -> bool {
        matches!(self, SessionState::Starting | SessionState::Sending)
    }

    /// True while the status poller should run, including while the send
    /// request itself is still in flight
    pub fn is_polling(self) -> bool {
        self.is_sending()
    }
}

/// The single visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub level: NotificationLevel,
}

/// Main composer model
#[derive(Debug, Clone)]
pub struct Model {
    /// Committed draft sent to the service
    pub draft: Draft,

    /// Body editor buffer, committed to the draft on blur
    pub body_editor: String,

    /// Path typed into the recipients file field
    pub file_input: String,

    /// Focused form field
    pub focus: Field,

    pub recipients: RecipientList,

    pub status: SendStatus,

    /// Set once a poll reports every recipient processed
    pub all_sent: bool,

    pub session: SessionState,

    pub notification: Option<Notification>,

    pub notification_duration: Duration,

    pub should_quit: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            draft: Draft::default(),
            body_editor: String::new(),
            file_input: String::new(),
            focus: Field::Sender,
            recipients: RecipientList::default(),
            status: SendStatus::default(),
            all_sent: false,
            session: SessionState::Idle,
            notification: None,
            notification_duration: NOTIFICATION_DURATION,
            should_quit: false,
        }
    }
}

impl Model {
    pub fn new(notification_duration: Duration) -> Self {
        Self {
            notification_duration,
            ..Self::default()
        }
    }

    /// Start from an existing draft; the body editor mirrors the draft body
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.body_editor = draft.body.clone();
        self.draft = draft;
        self
    }

    /// Copy the editor buffer into the draft body
    pub fn commit_body(&mut self) {
        if self.draft.body != self.body_editor {
            self.draft.body = self.body_editor.clone();
        }
    }

    pub fn is_sending(&self) -> bool {
        self.session.is_sending()
    }

    pub fn visible_notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Text shown for a field (password masked)
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Sender => self.draft.sender.clone(),
            Field::Password => self.draft.credential.masked(),
            Field::Subject => self.draft.subject.clone(),
            Field::RecipientsFile => self.file_input.clone(),
            Field::Body => self.body_editor.clone(),
        }
    }
}
