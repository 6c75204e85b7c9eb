//! Inbound message filtering.
//!
//! Discord messages arrive over the gateway through serenity's `EventHandler`.
//! [`InboundFilter`] decides which of them are worth scanning and reduces the
//! accepted ones to the fields the snippet pipeline needs.

use std::collections::HashSet;

use serenity::model::channel::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author_id: u64,
    pub content: String,
}

impl InboundMessage {
    /// Direct messages have no guild, and no other user's embeds to suppress.
    pub fn in_guild(&self) -> bool {
        self.guild_id.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InboundFilter {
    /// Authors that are always ignored, typically this bot's own user.
    pub ignored_user_ids: HashSet<u64>,
}

impl InboundFilter {
    pub fn new(ignored_user_ids: HashSet<u64>) -> Self {
        Self { ignored_user_ids }
    }

    pub fn is_bot_message(&self, author_id: u64, is_bot: bool) -> bool {
        is_bot || self.ignored_user_ids.contains(&author_id)
    }

    pub fn accept(&self, message: &Message) -> Option<InboundMessage> {
        let author_id = message.author.id.get();
        if self.is_bot_message(author_id, message.author.bot) {
            return None;
        }
        if message.content.trim().is_empty() {
            return None;
        }
        Some(InboundMessage {
            message_id: message.id.get(),
            channel_id: message.channel_id.get(),
            guild_id: message.guild_id.map(|id| id.get()),
            author_id,
            content: message.content.clone(),
        })
    }
}
