pub mod config;
pub mod error;
pub mod gateway;
pub mod inbound;
pub mod reply;

pub use config::BotConfig;
pub use error::BotError;
pub use gateway::{run, SnippetHandler};
