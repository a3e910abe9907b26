/// The Elm Architecture (TEA) pattern implementation for the composer
///
/// State lives in one [`Model`]; [`update`] turns messages into a new model
/// plus [`Command`]s, and the runtime executes those commands.

pub mod command;
pub mod message;
pub mod model;
pub mod subscription;
pub mod update;

pub use command::{Command, CommandExecutor};
pub use message::Message;
pub use model::Model;
pub use subscription::{Poller, Subscriptions};
pub use update::update;

/// Result of processing a TEA update cycle
#[derive(Debug)]
pub struct UpdateResult<M> {
    pub model: M,
    pub commands: Vec<Command>,
}

impl<M> UpdateResult<M> {
    pub fn new(model: M, commands: Vec<Command>) -> Self {
        Self { model, commands }
    }

    pub fn just_model(model: M) -> Self {
        Self {
            model,
            commands: Vec::new(),
        }
    }

    pub fn with_command(model: M, command: Command) -> Self {
        Self {
            model,
            commands: vec![command],
        }
    }
}
