/// Long-running subscriptions derived from the model
///
/// The status poller exists exactly while the session is `Starting` or
/// `Sending`.
/// Dropping a [`Poller`] aborts its task, so every exit path releases it.

use crate::remote::MailService;
use crate::tea::message::{Message, SendMessage};
use crate::tea::model::Model;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Periodic `GET /email-status` task
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// First poll fires one full interval after spawning
    pub fn spawn(
        service: Arc<dyn MailService>,
        period: Duration,
        sender: mpsc::UnboundedSender<Message>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let result = service.poll_status().await.map_err(|e| e.to_string());
                if sender.send(Message::Send(SendMessage::StatusPolled(result))).is_err() {
                    break;
                }
            }
        });

        tracing::debug!("Status poller started ({:?} interval)", period);
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Status poller stopped");
    }
}

/// Keeps subscriptions in line with the model after every update
pub struct Subscriptions {
    service: Arc<dyn MailService>,
    sender: mpsc::UnboundedSender<Message>,
    poll_interval: Duration,
    poller: Option<Poller>,
    closed: bool,
}

impl Subscriptions {
    pub fn new(
        service: Arc<dyn MailService>,
        sender: mpsc::UnboundedSender<Message>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            service,
            sender,
            poll_interval,
            poller: None,
            closed: false,
        }
    }

    /// Start or stop the poller to match the session state
    pub fn sync(&mut self, model: &Model) {
        if self.closed {
            return;
        }

        match (model.session.is_polling(), self.poller.is_some()) {
            (true, false) => {
                self.poller = Some(Poller::spawn(
                    Arc::clone(&self.service),
                    self.poll_interval,
                    self.sender.clone(),
                ));
            }
            (false, true) => self.poller = None,
            _ => {}
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Release everything; nothing is started again afterwards
    pub fn shutdown(&mut self) {
        self.closed = true;
        self.poller = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tea::model::SessionState;
    use crate::testing::MockMailService;

    fn subscriptions(mock: &MockMailService) -> (Subscriptions, mpsc::UnboundedReceiver<Message>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let subs = Subscriptions::new(Arc::new(mock.clone()), sender, Duration::from_secs(5));
        (subs, receiver)
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_follows_session() {
        let mock = MockMailService::new();
        let (mut subs, mut receiver) = subscriptions(&mock);
        let mut model = Model::default();

        subs.sync(&model);
        assert!(!subs.is_polling());

        model.session = SessionState::Starting;
        subs.sync(&model);
        assert!(subs.is_polling());

        let start = Instant::now();
        let message = receiver.recv().await.unwrap();
        assert!(matches!(message, Message::Send(SendMessage::StatusPolled(Ok(_)))));
        assert_eq!(start.elapsed(), Duration::from_secs(5));

        // Accepting the send keeps the same poller
        model.session = SessionState::Sending;
        subs.sync(&model);
        let message = receiver.recv().await.unwrap();
        assert!(matches!(message, Message::Send(SendMessage::StatusPolled(Ok(_)))));
        assert_eq!(start.elapsed(), Duration::from_secs(10));

        model.session = SessionState::Completed;
        subs.sync(&model);
        assert!(!subs.is_polling());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(mock.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_final() {
        let mock = MockMailService::new();
        let (mut subs, _receiver) = subscriptions(&mock);
        let mut model = Model::default();
        model.session = SessionState::Sending;

        subs.sync(&model);
        subs.shutdown();
        subs.shutdown();
        subs.sync(&model);
        assert!(!subs.is_polling());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(mock.poll_count(), 0);
    }
}
