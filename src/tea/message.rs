/// Central message type for the composer following the TEA pattern
///
/// User input, results of remote calls and timer expiries all arrive here
/// and are applied to the model by the update function.

use crate::recipients::RecipientList;
use crate::remote::SendStatus;
use std::path::PathBuf;
use uuid::Uuid;

/// Main application message type
#[derive(Debug, Clone)]
pub enum Message {
    /// Form editing and navigation
    UI(UIMessage),

    /// Recipient list ingestion
    Recipients(RecipientsMessage),

    /// Send session lifecycle
    Send(SendMessage),

    /// Transient notification
    Notification(NotificationMessage),
}

/// Form field that currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sender,
    Password,
    Subject,
    RecipientsFile,
    Body,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Sender,
        Field::Password,
        Field::Subject,
        Field::RecipientsFile,
        Field::Body,
    ];

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Sender => "Your Email Address",
            Field::Password => "App-Specific Password",
            Field::Subject => "Email Subject",
            Field::RecipientsFile => "Recipients File (CSV/Excel)",
            Field::Body => "Email Content (HTML)",
        }
    }
}

/// UI interaction messages
#[derive(Debug, Clone)]
pub enum UIMessage {
    /// Move focus forward
    FocusNext,

    /// Move focus backward
    FocusPrevious,

    /// Type a character into the focused field
    InsertChar(char),

    /// Delete the last character of the focused field
    Backspace,

    /// Quit the composer
    Quit,
}

/// Recipient ingestion messages
#[derive(Debug, Clone)]
pub enum RecipientsMessage {
    /// Read recipients from a spreadsheet
    Load(PathBuf),

    /// Ingestion finished
    Loaded {
        path: PathBuf,
        result: Result<RecipientList, String>,
    },
}

/// Send session messages
#[derive(Debug, Clone)]
pub enum SendMessage {
    /// User asked to start sending
    Start,

    /// Mail service accepted the send request
    Started,

    /// Send request failed
    StartFailed(String),

    /// User asked to stop sending
    Stop,

    /// Mail service acknowledged the stop
    Stopped,

    /// Stop request failed
    StopFailed(String),

    /// Result of one status poll
    StatusPolled(Result<SendStatus, String>),
}

/// Notification messages
#[derive(Debug, Clone)]
pub enum NotificationMessage {
    /// Show a notification, replacing any visible one
    Show(String, NotificationLevel),

    /// Dismiss timer fired for the given notification
    Expired(Uuid),
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycle_wraps() {
        assert_eq!(Field::Sender.next(), Field::Password);
        assert_eq!(Field::Body.next(), Field::Sender);
        assert_eq!(Field::Sender.previous(), Field::Body);
        assert_eq!(Field::RecipientsFile.previous(), Field::Subject);
    }
}
