use crate::credentials::Credential;
use crate::recipients::RecipientList;
use crate::tea::model::Draft;
use serde::{Deserialize, Serialize};

/// Everything the mail service needs to start a bulk send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub sender: String,
    pub credential: Credential,
    pub subject: String,
    /// HTML body
    pub content: String,
    pub recipients: Vec<String>,
}

impl SendRequest {
    pub fn new(draft: &Draft, recipients: &RecipientList) -> Self {
        Self {
            sender: draft.sender.clone(),
            credential: draft.credential.clone(),
            subject: draft.subject.clone(),
            content: draft.body.clone(),
            recipients: recipients.addresses().to_vec(),
        }
    }

    /// Body for `POST /send-email`
    pub(crate) fn wire(&self) -> WireSendRequest<'_> {
        WireSendRequest {
            email: &self.sender,
            password: self.credential.expose(),
            content: &self.content,
            emails: &self.recipients,
            subject: &self.subject,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WireSendRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub content: &'a str,
    pub emails: &'a [String],
    pub subject: &'a str,
}

/// Progress counters as reported by `GET /email-status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SendStatus {
    pub total: u64,
    pub sent: u64,
    pub failed: u64,
    pub all_emails_sent: bool,
}

impl SendStatus {
    /// Counters for a freshly ingested list
    pub fn fresh(total: usize) -> Self {
        Self {
            total: total as u64,
            ..Self::default()
        }
    }

    /// Recipients not yet reported as sent or failed
    pub fn pending(&self) -> u64 {
        self.total.saturating_sub(self.sent + self.failed)
    }
}
