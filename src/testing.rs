//! Mock mail service for tests

use crate::error::{SenderError, SenderResult};
use crate::remote::{MailService, SendRequest, SendStatus};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Record of a call made to the mock service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    StartSend(SendRequest),
    StopSend,
    PollStatus,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<MockCall>,
    fail_start: bool,
    fail_stop: bool,
    start_delay: Option<Duration>,
    statuses: VecDeque<SendStatus>,
    last_status: SendStatus,
}

/// Scriptable [`MailService`] that records every call
#[derive(Debug, Clone, Default)]
pub struct MockMailService {
    state: Arc<Mutex<MockState>>,
}

impl MockMailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `start_send` fail
    pub fn failing_start(self) -> Self {
        self.with_state(|state| state.fail_start = true);
        self
    }

    /// Hold `start_send` open for `delay` before answering
    pub fn with_start_delay(self, delay: Duration) -> Self {
        self.with_state(|state| state.start_delay = Some(delay));
        self
    }

    /// Make `stop_send` fail
    pub fn failing_stop(self) -> Self {
        self.with_state(|state| state.fail_stop = true);
        self
    }

    /// Queue status responses; the last one repeats once the queue drains
    pub fn with_statuses<I: IntoIterator<Item = SendStatus>>(self, statuses: I) -> Self {
        self.with_state(|state| state.statuses.extend(statuses));
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.with_state(|state| state.calls.clone())
    }

    pub fn poll_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MockCall::PollStatus))
            .count()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }
}

#[async_trait]
impl MailService for MockMailService {
    async fn start_send(&self, request: &SendRequest) -> SenderResult<()> {
        let delay = self.with_state(|state| {
            state.calls.push(MockCall::StartSend(request.clone()));
            state.start_delay
        });
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.with_state(|state| {
            if state.fail_start {
                Err(SenderError::RemoteStatus {
                    status: 500,
                    message: "mock start failure".to_string(),
                })
            } else {
                Ok(())
            }
        })
    }

    async fn stop_send(&self) -> SenderResult<()> {
        self.with_state(|state| {
            state.calls.push(MockCall::StopSend);
            if state.fail_stop {
                Err(SenderError::Timeout)
            } else {
                Ok(())
            }
        })
    }

    async fn poll_status(&self) -> SenderResult<SendStatus> {
        self.with_state(|state| {
            state.calls.push(MockCall::PollStatus);
            if let Some(next) = state.statuses.pop_front() {
                state.last_status = next;
            }
            Ok(state.last_status)
        })
    }
}
