pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod events;
pub mod recipients;
pub mod remote;
pub mod tea;
pub mod testing;
pub mod ui;

pub use app::App;
pub use error::{SenderError, SenderResult};
