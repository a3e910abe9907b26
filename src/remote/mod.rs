//! Remote mail service collaborator
//!
//! The service owns the actual delivery. The client only starts a send,
//! stops it, and reads progress counters.

pub mod client;
pub mod types;

pub use client::HttpMailService;
pub use types::{SendRequest, SendStatus};

use crate::error::SenderResult;
use async_trait::async_trait;

/// Operations the composer needs from the mail service
#[async_trait]
pub trait MailService: Send + Sync {
    /// `POST /send-email`
    async fn start_send(&self, request: &SendRequest) -> SenderResult<()>;

    /// `POST /stop-email`
    async fn stop_send(&self) -> SenderResult<()>;

    /// `GET /email-status`
    async fn poll_status(&self) -> SenderResult<SendStatus>;
}
