//! Snippet resolution for forge links posted in chat.
//!
//! Text goes through [`patterns`] (URL recognition), [`forges`] (fetching the
//! referenced file), [`format`] (line extraction and code-block rendering)
//! and [`aggregate`] (per-message concatenation under the reply budget).

pub mod aggregate;
pub mod config;
pub mod error;
pub mod forges;
pub mod format;
pub mod patterns;

pub use aggregate::{aggregate, AggregateOutcome, AggregatedReply, SnippetSource};
pub use config::ForgeConfig;
pub use error::SnippetError;
pub use forges::{ForgeClient, ResolvedFile};
pub use format::{render_snippet, FormattedSnippet, LineRange};
pub use patterns::{find_references, Forge, LineSpan, SnippetReference};
