//! Per-message aggregation of snippet replies.
//!
//! Every reference found in a message is fetched (concurrently) and rendered;
//! the rendered snippets are concatenated in discovery order and the result is
//! checked once against the platform's message budget.

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::SnippetError;
use crate::format::{render_snippet, FormattedSnippet};
use crate::forges::{ForgeClient, ResolvedFile};
use crate::patterns::{find_references, SnippetReference};

/// Platform ceiling on message length, in characters.
pub const MAX_REPLY_CHARS: usize = 2000;
/// Most newlines a reply may contain.
pub const MAX_REPLY_LINES: usize = 50;

pub const TOO_LONG_NOTICE: &str =
    "That snippet is too long to show here (over 2000 characters).";
pub const NO_VALID_SNIPPETS_NOTICE: &str = "I couldn't find any valid snippets in that message.";
pub const TOO_MANY_LINES_NOTICE: &str =
    "That snippet has too many lines to show here (over 50 lines).";

/// Anything that can turn a snippet reference into file contents.
#[async_trait]
pub trait SnippetSource: Send + Sync {
    async fn fetch(
        &self,
        reference: &SnippetReference,
    ) -> Result<Option<ResolvedFile>, SnippetError>;
}

#[async_trait]
impl SnippetSource for ForgeClient {
    async fn fetch(
        &self,
        reference: &SnippetReference,
    ) -> Result<Option<ResolvedFile>, SnippetError> {
        self.resolve(reference).await
    }
}

/// What to do with one incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutcome {
    /// The message contains no snippet links; stay silent.
    NoMatches,
    TooLong,
    NoValidSnippets,
    TooManyLines,
    Reply(String),
}

impl AggregateOutcome {
    /// Text to post in the channel, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            AggregateOutcome::NoMatches => None,
            AggregateOutcome::TooLong => Some(TOO_LONG_NOTICE),
            AggregateOutcome::NoValidSnippets => Some(NO_VALID_SNIPPETS_NOTICE),
            AggregateOutcome::TooManyLines => Some(TOO_MANY_LINES_NOTICE),
            AggregateOutcome::Reply(text) => Some(text),
        }
    }
}

/// Reply buffer with running character and newline counts.
#[derive(Debug, Default, Clone)]
pub struct AggregatedReply {
    text: String,
    char_count: usize,
    line_count: usize,
}

impl AggregatedReply {
    pub fn push(&mut self, snippet: &FormattedSnippet) {
        let rendered = snippet.to_string();
        self.char_count += rendered.chars().count();
        self.line_count += rendered.matches('\n').count();
        self.text.push_str(&rendered);
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Apply the budget: too long, then empty, then too many lines.
    pub fn into_outcome(self) -> AggregateOutcome {
        if self.char_count > MAX_REPLY_CHARS {
            AggregateOutcome::TooLong
        } else if self.char_count == 0 {
            AggregateOutcome::NoValidSnippets
        } else if self.line_count > MAX_REPLY_LINES {
            AggregateOutcome::TooManyLines
        } else {
            AggregateOutcome::Reply(self.text)
        }
    }
}

/// Build the reply for one message.
///
/// A reference whose fetch fails contributes nothing; the other references
/// in the same message are unaffected.
pub async fn aggregate<S>(text: &str, source: &S) -> AggregateOutcome
where
    S: SnippetSource + ?Sized,
{
    let references: Vec<SnippetReference> = find_references(text).collect();
    if references.is_empty() {
        return AggregateOutcome::NoMatches;
    }
    debug!("found {} snippet references", references.len());

    let snippets = join_all(
        references
            .iter()
            .map(|reference| snippet_for(source, reference)),
    )
    .await;

    let mut reply = AggregatedReply::default();
    for snippet in snippets.iter().flatten() {
        reply.push(snippet);
    }
    reply.into_outcome()
}

async fn snippet_for<S>(source: &S, reference: &SnippetReference) -> Option<FormattedSnippet>
where
    S: SnippetSource + ?Sized,
{
    match source.fetch(reference).await {
        Ok(Some(file)) => render_snippet(&file.contents, &file.display_path, reference.lines),
        Ok(None) => None,
        Err(err) => {
            warn!(
                "dropping {} snippet for {}: {}",
                reference.forge, reference.repo, err
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::LineSpan;

    fn snippet(header: &str, block: &str) -> FormattedSnippet {
        FormattedSnippet {
            header_text: header.to_string(),
            code_block: block.to_string(),
        }
    }

    #[test]
    fn empty_buffer_is_no_valid_snippets() {
        assert_eq!(
            AggregatedReply::default().into_outcome(),
            AggregateOutcome::NoValidSnippets
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut reply = AggregatedReply::default();
        reply.push(&snippet("é\n", "ü"));
        assert_eq!(reply.char_count(), 3);
        assert_eq!(reply.line_count(), 1);
    }

    #[test]
    fn too_long_checked_before_too_many_lines() {
        let mut reply = AggregatedReply::default();
        reply.push(&snippet(&"\n".repeat(MAX_REPLY_CHARS + 1), ""));
        assert_eq!(reply.into_outcome(), AggregateOutcome::TooLong);
    }

    #[test]
    fn line_budget_is_inclusive() {
        let mut reply = AggregatedReply::default();
        reply.push(&snippet(&"x\n".repeat(MAX_REPLY_LINES), ""));
        assert!(matches!(reply.clone().into_outcome(), AggregateOutcome::Reply(_)));
        reply.push(&snippet("\n", ""));
        assert_eq!(reply.into_outcome(), AggregateOutcome::TooManyLines);
    }

    #[test]
    fn char_budget_is_inclusive() {
        let mut reply = AggregatedReply::default();
        reply.push(&snippet(&"a".repeat(MAX_REPLY_CHARS), ""));
        assert!(matches!(reply.into_outcome(), AggregateOutcome::Reply(_)));
    }

    #[test]
    fn notices_are_distinct() {
        let notices = [
            AggregateOutcome::TooLong.message(),
            AggregateOutcome::NoValidSnippets.message(),
            AggregateOutcome::TooManyLines.message(),
        ];
        assert_eq!(notices[0], Some(TOO_LONG_NOTICE));
        assert_ne!(notices[0], notices[1]);
        assert_ne!(notices[1], notices[2]);
        assert_eq!(AggregateOutcome::NoMatches.message(), None);
        assert_eq!(
            AggregateOutcome::Reply("hi".to_string()).message(),
            Some("hi")
        );
    }

    #[test]
    fn line_span_is_forwarded_to_renderer() {
        let rendered = render_snippet("a\nb\nc\n", "x.txt", Some(LineSpan::range(2, 3))).unwrap();
        let mut reply = AggregatedReply::default();
        reply.push(&rendered);
        assert_eq!(
            reply.into_outcome(),
            AggregateOutcome::Reply("`x.txt` lines 2 to 3\n```txt\nb\nc```\n".to_string())
        );
    }
}
