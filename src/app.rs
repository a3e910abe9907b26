use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::events::EventHandler;
use crate::remote::{MailService, SendStatus};
use crate::tea::message::{Message, RecipientsMessage, SendMessage};
use crate::tea::model::{Draft, SessionState};
use crate::tea::{update, CommandExecutor, Model, Subscriptions, UpdateResult};
use crate::ui;

/// How a headless session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Service reported every recipient processed
    Completed,
    /// Send accepted; not waiting for progress
    Accepted,
    /// Stopped on request
    Stopped,
    /// Service rejected or never received the send request
    Failed,
}

/// Composer runtime: owns the model and runs its side effects
pub struct App {
    model: Model,
    executor: CommandExecutor,
    subscriptions: Subscriptions,
    receiver: mpsc::UnboundedReceiver<Message>,
    event_handler: EventHandler,
}

impl App {
    pub fn new(config: &AppConfig, service: Arc<dyn MailService>, draft: Draft) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let executor = CommandExecutor::new(Arc::clone(&service), sender.clone());
        let subscriptions = Subscriptions::new(service, sender, config.poll_interval());

        Self {
            model: Model::new(config.notification_duration()).with_draft(draft),
            executor,
            subscriptions,
            receiver,
            event_handler: EventHandler::new(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn is_polling(&self) -> bool {
        self.subscriptions.is_polling()
    }

    /// Apply one message, run its commands, and resync subscriptions
    pub fn dispatch(&mut self, message: Message) {
        let UpdateResult { model, commands } = update(std::mem::take(&mut self.model), message);
        self.model = model;

        for command in commands {
            self.executor.execute(command);
        }
        self.subscriptions.sync(&self.model);
    }

    /// Apply every message that is already waiting
    pub fn drain_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.dispatch(message);
            handled += 1;
        }
        handled
    }

    /// Wait for the next message and apply it; false if the channel closed
    pub async fn process_next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Release the poller; safe to call more than once
    pub fn shutdown(&mut self) {
        self.subscriptions.shutdown();
    }

    /// Run the interactive composer until the user quits
    pub async fn run(&mut self, initial_file: Option<PathBuf>) -> Result<()> {
        if !io::stdout().is_tty() {
            return Err(anyhow::anyhow!(
                "The composer requires a terminal (TTY). Use the `send` subcommand for scripted sends."
            ));
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        if let Some(path) = initial_file {
            self.model.file_input = path.display().to_string();
            self.dispatch(Message::Recipients(RecipientsMessage::Load(path)));
        }

        let result = self.run_loop(&mut terminal).await;

        // Teardown happens on every exit path of the loop
        self.shutdown();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let tick_rate = Duration::from_millis(50);

        loop {
            self.drain_pending();
            if self.model.should_quit {
                tracing::info!("Composer closed");
                return Ok(());
            }

            terminal.draw(|frame| ui::render(frame, &self.model))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(message) = self.event_handler.handle_key_event(key, &self.model) {
                        self.dispatch(message);
                    }
                }
            }

            // Give spawned tasks a chance to report back
            tokio::task::yield_now().await;
        }
    }

    /// Start a send without the terminal UI and report progress to `out`
    ///
    /// With `wait`, polls until the service reports completion or the user
    /// interrupts with Ctrl-C (which requests a stop). Without it, returns
    /// once the service has accepted the request.
    pub async fn run_headless<W: Write>(&mut self, wait: bool, out: &mut W) -> Result<SessionOutcome> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut stop_requested = false;
        let mut start_failed = false;

        let mut reporter = Reporter::default();
        writeln!(out, "Sending to {} recipients...", self.model.recipients.len())?;

        self.dispatch(Message::Send(SendMessage::Start));

        let outcome = loop {
            reporter.report(&self.model, out)?;

            match self.model.session {
                SessionState::Completed => break SessionOutcome::Completed,
                SessionState::Idle if start_failed => break SessionOutcome::Failed,
                SessionState::Idle => break SessionOutcome::Stopped,
                SessionState::Sending if !wait => break SessionOutcome::Accepted,
                SessionState::Starting | SessionState::Sending => {}
            }

            tokio::select! {
                message = self.receiver.recv() => match message {
                    Some(message) => {
                        if matches!(message, Message::Send(SendMessage::StartFailed(_))) {
                            start_failed = true;
                        }
                        self.dispatch(message);
                    }
                    None => break SessionOutcome::Failed,
                },
                _ = &mut ctrl_c, if !stop_requested => {
                    stop_requested = true;
                    writeln!(out, "Interrupted, requesting stop...")?;
                    self.dispatch(Message::Send(SendMessage::Stop));
                }
            }
        };

        self.shutdown();
        if outcome == SessionOutcome::Completed {
            writeln!(out, "{}", ui::progress::ALL_SENT_TEXT)?;
        }
        Ok(outcome)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Prints notifications and counter changes once each
#[derive(Debug, Default)]
struct Reporter {
    last_notification: Option<Uuid>,
    last_status: Option<SendStatus>,
}

impl Reporter {
    fn report<W: Write>(&mut self, model: &Model, out: &mut W) -> io::Result<()> {
        if let Some(notification) = model.visible_notification() {
            if self.last_notification != Some(notification.id) {
                self.last_notification = Some(notification.id);
                writeln!(
                    out,
                    "{} {}",
                    ui::toast::icon(notification.level),
                    notification.message
                )?;
            }
        }

        if model.session != SessionState::Starting && self.last_status != Some(model.status) {
            self.last_status = Some(model.status);
            writeln!(
                out,
                "Total: {}  Sent: {}  Failed: {}",
                model.status.total, model.status.sent, model.status.failed
            )?;
        }
        Ok(())
    }
}
