use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::{App, SessionOutcome};
use crate::config::AppConfig;
use crate::credentials::{Credential, CredentialStore};
use crate::recipients::{ingest_file, RecipientList};
use crate::remote::{HttpMailService, MailService};
use crate::tea::message::{Message, RecipientsMessage};
use crate::tea::model::Draft;

/// Email Sender - compose a bulk email and drive a remote sending service
#[derive(Parser, Debug)]
#[command(name = "email-sender")]
#[command(about = "Compose a bulk email, load recipients from a spreadsheet, and send it through a mail service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Mail service base URL (overrides config and EMAIL_SENDER_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

impl Cli {
    /// Whether this invocation opens the terminal composer
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Compose(_)))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive composer (default)
    Compose(ComposeArgs),

    /// Show the recipients a spreadsheet would produce
    Recipients(RecipientsArgs),

    /// Send without the composer and report progress
    Send(SendArgs),

    /// Ask the mail service to stop the current send
    Stop,

    /// Print the mail service's current counters
    Status,

    /// Manage app passwords in the system keyring
    Credential(CredentialArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Spreadsheet to load on startup
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RecipientsArgs {
    /// CSV or Excel file; the first column of the first sheet is read
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Sender address (defaults to `default_sender` from the config)
    #[arg(long)]
    pub from: Option<String>,

    /// Email subject
    #[arg(long, default_value = "")]
    pub subject: String,

    /// HTML file with the email content
    #[arg(long)]
    pub body: Option<PathBuf>,

    /// Recipient spreadsheet
    #[arg(long, short)]
    pub file: PathBuf,

    /// Read the app password from stdin instead of the keyring
    #[arg(long)]
    pub password_stdin: bool,

    /// Store the password in the keyring for next time
    #[arg(long, requires = "password_stdin")]
    pub remember: bool,

    /// Return once the service accepts the request
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[command(subcommand)]
    pub action: CredentialAction,
}

#[derive(Subcommand, Debug)]
pub enum CredentialAction {
    /// Store an app password (read from stdin)
    Set {
        /// Sender address the password belongs to
        sender: String,
    },
    /// Remove a stored app password
    Clear {
        /// Sender address the password belongs to
        sender: String,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Executes command-line subcommands
pub struct CliHandler {
    config: AppConfig,
    config_path: PathBuf,
    service: Arc<dyn MailService>,
    credentials: CredentialStore,
}

impl CliHandler {
    /// Create a handler from the global flags
    pub fn new(config_dir: Option<&Path>, base_url: Option<String>) -> Result<Self> {
        let config_path = AppConfig::path_in(config_dir)?;
        let config = AppConfig::load(config_dir)?.with_base_url(base_url)?;
        let service = HttpMailService::new(&config.parsed_base_url()?, config.request_timeout())?;

        Ok(Self::with_service(config, config_path, Arc::new(service)))
    }

    /// Create a handler around an existing mail service
    pub fn with_service(config: AppConfig, config_path: PathBuf, service: Arc<dyn MailService>) -> Self {
        Self {
            config,
            config_path,
            service,
            credentials: CredentialStore::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open the interactive composer
    pub async fn run_composer(&self, file: Option<PathBuf>) -> Result<()> {
        let sender = self.config.default_sender.clone().unwrap_or_default();
        let credential = self.credentials.load(&sender).unwrap_or_default();
        let draft = Draft {
            sender,
            credential,
            ..Draft::default()
        };

        let mut app = App::new(&self.config, Arc::clone(&self.service), draft);
        app.run(file).await
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Compose(args) => self.run_composer(args.file).await,
            Commands::Recipients(args) => self.handle_recipients(args),
            Commands::Send(args) => self.handle_send(args).await,
            Commands::Stop => self.handle_stop().await,
            Commands::Status => self.handle_status().await,
            Commands::Credential(args) => self.handle_credential(args),
            Commands::Config(args) => self.handle_config(args),
        }
    }

    fn handle_recipients(&self, args: RecipientsArgs) -> Result<()> {
        let list = ingest_file(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;

        for address in list.iter() {
            println!("{}", address);
        }
        println!("Total emails: {}", list.len());
        Ok(())
    }

    async fn handle_send(&self, args: SendArgs) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let outcome = self.send(args, &mut io::stdin().lock(), &mut out).await?;

        match outcome {
            SessionOutcome::Failed => Err(anyhow!("Failed to start email sending")),
            _ => Ok(()),
        }
    }

    /// Headless send; the password is read from `input` when requested
    pub async fn send<R: BufRead, W: Write>(
        &self,
        args: SendArgs,
        input: &mut R,
        out: &mut W,
    ) -> Result<SessionOutcome> {
        let recipients = ingest_file(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;

        let sender = args
            .from
            .or_else(|| self.config.default_sender.clone())
            .unwrap_or_default();

        let credential = if args.password_stdin {
            let credential = read_secret(input)?;
            if args.remember {
                self.credentials.store(&sender, &credential)?;
            }
            credential
        } else {
            self.credentials.load(&sender).unwrap_or_default()
        };
        if credential.is_empty() {
            tracing::warn!("No app password for {:?}; sending anyway", sender);
        }

        let body = match &args.body {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read body from {}", path.display()))?,
            None => String::new(),
        };

        let draft = Draft {
            sender,
            credential,
            subject: args.subject,
            body,
        };

        let mut app = App::new(&self.config, Arc::clone(&self.service), draft);
        app.dispatch(loaded_message(&args.file, recipients));
        app.run_headless(!args.no_wait, out).await
    }

    async fn handle_stop(&self) -> Result<()> {
        self.service
            .stop_send()
            .await
            .context("Error stopping email process")?;
        println!("Email sending process stopped.");
        Ok(())
    }

    async fn handle_status(&self) -> Result<()> {
        let status = self
            .service
            .poll_status()
            .await
            .context("Error polling email status")?;

        println!("Total emails:  {}", status.total);
        println!("Sent emails:   {}", status.sent);
        println!("Failed emails: {}", status.failed);
        if status.all_emails_sent {
            println!("All emails sent successfully!");
        }
        Ok(())
    }

    fn handle_credential(&self, args: CredentialArgs) -> Result<()> {
        match args.action {
            CredentialAction::Set { sender } => {
                eprint!("App-specific password for {}: ", sender);
                io::stderr().flush()?;
                let credential = read_secret(&mut io::stdin().lock())?;
                self.credentials.store(&sender, &credential)?;
                println!("Stored app password for {} in the system keyring", sender);
            }
            CredentialAction::Clear { sender } => {
                self.credentials.clear(&sender)?;
                println!("Removed stored app password for {}", sender);
            }
        }
        Ok(())
    }

    fn handle_config(&self, args: ConfigArgs) -> Result<()> {
        match args.action {
            ConfigAction::Show => {
                println!("# {}", self.config_path.display());
                print!("{}", toml::to_string_pretty(&self.config)?);
            }
            ConfigAction::Init { force } => {
                if self.config_path.exists() && !force {
                    return Err(anyhow!(
                        "{} already exists (use --force to overwrite)",
                        self.config_path.display()
                    ));
                }
                AppConfig::default().save(&self.config_path)?;
                println!("Wrote default configuration to {}", self.config_path.display());
            }
        }
        Ok(())
    }
}

/// Message that installs an already-ingested list
fn loaded_message(path: &Path, list: RecipientList) -> Message {
    Message::Recipients(RecipientsMessage::Loaded {
        path: path.to_path_buf(),
        result: Ok(list),
    })
}

/// Read one line as a secret, without the trailing newline
fn read_secret<R: BufRead>(input: &mut R) -> Result<Credential> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(Credential::new(line.trim_end_matches(['\r', '\n'])))
}
