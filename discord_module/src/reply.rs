//! Reply lifecycle.
//!
//! A reply is posted, optionally hides the native link previews of the message
//! it answers, and carries a delete reaction. If the original author clicks it
//! before the timeout the reply is deleted, otherwise the bot withdraws its own
//! reaction and the reply stays.

use std::time::Duration;

use serenity::async_trait;
use serenity::builder::EditMessage;
use serenity::client::Context;
use serenity::model::channel::{Message, ReactionType};
use tracing::{debug, warn};

use crate::error::BotError;

pub const DELETE_EMOJI: &str = "\u{1f5d1}\u{fe0f}";

fn delete_reaction() -> ReactionType {
    ReactionType::Unicode(DELETE_EMOJI.to_string())
}

/// The chat operations a reply needs, relative to one source message.
#[async_trait]
pub trait ReplyTransport: Send + Sync {
    type Reply: Send + Sync;

    async fn send(&self, content: &str) -> Result<Self::Reply, BotError>;
    async fn suppress_source_embeds(&self) -> Result<(), BotError>;
    async fn add_delete_reaction(&self, reply: &Self::Reply) -> Result<(), BotError>;
    /// Resolves once the source author reacts with [`DELETE_EMOJI`]. Returns
    /// `false` if the reaction stream ends first.
    async fn wait_for_delete(&self, reply: &Self::Reply) -> bool;
    async fn remove_delete_reaction(&self, reply: &Self::Reply) -> Result<(), BotError>;
    async fn delete(&self, reply: &Self::Reply) -> Result<(), BotError>;
}

#[derive(Debug, Clone, Copy)]
pub struct PublishOptions {
    pub suppress_source_embeds: bool,
    pub delete_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFate {
    Deleted,
    Kept,
}

pub async fn publish<T>(
    transport: &T,
    content: &str,
    options: PublishOptions,
) -> Result<ReplyFate, BotError>
where
    T: ReplyTransport + ?Sized,
{
    let reply = transport.send(content).await?;

    if options.suppress_source_embeds {
        // Needs Manage Messages; the reply is still useful without it.
        if let Err(err) = transport.suppress_source_embeds().await {
            warn!("failed to suppress source embeds: {}", err);
        }
    }

    transport.add_delete_reaction(&reply).await?;

    let triggered = tokio::time::timeout(options.delete_timeout, transport.wait_for_delete(&reply))
        .await
        .unwrap_or(false);

    if triggered {
        debug!("delete reaction triggered, removing reply");
        transport.delete(&reply).await?;
        Ok(ReplyFate::Deleted)
    } else {
        transport.remove_delete_reaction(&reply).await?;
        Ok(ReplyFate::Kept)
    }
}

/// [`ReplyTransport`] over a live serenity context.
pub struct SerenityTransport<'a> {
    ctx: &'a Context,
    source: &'a Message,
}

impl<'a> SerenityTransport<'a> {
    pub fn new(ctx: &'a Context, source: &'a Message) -> Self {
        Self { ctx, source }
    }
}

#[async_trait]
impl ReplyTransport for SerenityTransport<'_> {
    type Reply = Message;

    async fn send(&self, content: &str) -> Result<Message, BotError> {
        Ok(self.source.channel_id.say(&self.ctx.http, content).await?)
    }

    async fn suppress_source_embeds(&self) -> Result<(), BotError> {
        self.source
            .channel_id
            .edit_message(
                self.ctx,
                self.source.id,
                EditMessage::new().suppress_embeds(true),
            )
            .await?;
        Ok(())
    }

    async fn add_delete_reaction(&self, reply: &Message) -> Result<(), BotError> {
        reply.react(self.ctx, delete_reaction()).await?;
        Ok(())
    }

    async fn wait_for_delete(&self, reply: &Message) -> bool {
        reply
            .await_reaction(self.ctx)
            .author_id(self.source.author.id)
            .filter(|reaction| {
                matches!(&reaction.emoji, ReactionType::Unicode(emoji) if emoji == DELETE_EMOJI)
            })
            .await
            .is_some()
    }

    async fn remove_delete_reaction(&self, reply: &Message) -> Result<(), BotError> {
        reply
            .delete_reaction(&self.ctx.http, None, delete_reaction())
            .await?;
        Ok(())
    }

    async fn delete(&self, reply: &Message) -> Result<(), BotError> {
        reply.delete(self.ctx).await?;
        Ok(())
    }
}
