//! Discord Gateway client.
//!
//! Serenity runs every event handler call in its own task, so a reply waiting
//! on its delete reaction never holds up other messages.

use std::collections::HashSet;
use std::time::Duration;

use serenity::async_trait;
use serenity::client::{Client, Context, EventHandler};
use serenity::gateway::ActivityData;
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use snippet_module::{aggregate, AggregateOutcome, ForgeClient};
use tracing::{error, info};

use crate::config::BotConfig;
use crate::error::BotError;
use crate::inbound::{InboundFilter, InboundMessage};
use crate::reply::{publish, PublishOptions, SerenityTransport};

pub const PRESENCE: &str = "for snippet links";

pub struct SnippetHandler {
    filter: InboundFilter,
    forge: ForgeClient,
    delete_timeout: Duration,
}

impl SnippetHandler {
    pub fn new(filter: InboundFilter, forge: ForgeClient, delete_timeout: Duration) -> Self {
        Self {
            filter,
            forge,
            delete_timeout,
        }
    }

    async fn handle(
        &self,
        ctx: &Context,
        msg: &Message,
        inbound: &InboundMessage,
    ) -> Result<(), BotError> {
        let outcome = aggregate(&inbound.content, &self.forge).await;
        let Some(content) = outcome.message() else {
            return Ok(());
        };

        let options = PublishOptions {
            suppress_source_embeds: inbound.in_guild()
                && matches!(outcome, AggregateOutcome::Reply(_)),
            delete_timeout: self.delete_timeout,
        };
        let transport = SerenityTransport::new(ctx, msg);
        let fate = publish(&transport, content, options).await?;
        info!(
            "reply to message {} in channel {}: {:?}",
            inbound.message_id, inbound.channel_id, fate
        );
        Ok(())
    }
}

#[async_trait]
impl EventHandler for SnippetHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "discord bot connected as {} (id={})",
            ready.user.name, ready.user.id
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let Some(inbound) = self.filter.accept(&msg) else {
            return;
        };
        if let Err(err) = self.handle(&ctx, &msg, &inbound).await {
            error!(
                "failed to reply to message {} in channel {}: {}",
                inbound.message_id, inbound.channel_id, err
            );
        }
    }
}

pub fn gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGE_REACTIONS
}

/// Connects to the gateway and runs until the connection is closed.
pub async fn run(config: BotConfig) -> Result<(), BotError> {
    let ignored: HashSet<u64> = config.bot_user_id.into_iter().collect();
    let handler = SnippetHandler::new(
        InboundFilter::new(ignored),
        ForgeClient::new(config.forge),
        config.delete_timeout,
    );

    let mut client = Client::builder(&config.discord_token, gateway_intents())
        .event_handler(handler)
        .activity(ActivityData::watching(PRESENCE))
        .await?;

    info!("starting discord gateway client");
    client.start().await?;
    Ok(())
}
