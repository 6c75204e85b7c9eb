//! Bot configuration.
//!
//! - `DISCORD_TOKEN` (or `DISCORD_BOT_TOKEN`): gateway token, required
//! - `DISCORD_BOT_USER_ID`: optional id of this bot, ignored as a message author
//! - `DELETE_REACTION_TIMEOUT_SECS`: how long the delete reaction stays armed (default: 10)
//!
//! Forge credentials and endpoints are read by [`ForgeConfig`].

use std::env;
use std::time::Duration;

use snippet_module::config::normalize_value;
use snippet_module::ForgeConfig;

use crate::error::BotError;

pub const DEFAULT_DELETE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub bot_user_id: Option<u64>,
    pub delete_timeout: Duration,
    pub forge: ForgeConfig,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, BotError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).and_then(|value| normalize_value(&value));

        let discord_token = read("DISCORD_TOKEN")
            .or_else(|| read("DISCORD_BOT_TOKEN"))
            .ok_or(BotError::MissingEnv("DISCORD_TOKEN"))?;

        let bot_user_id = match read("DISCORD_BOT_USER_ID") {
            Some(value) => Some(value.parse::<u64>().map_err(|_| BotError::InvalidEnv {
                key: "DISCORD_BOT_USER_ID",
                value,
            })?),
            None => None,
        };

        let delete_timeout = match read("DELETE_REACTION_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(BotError::InvalidEnv {
                        key: "DELETE_REACTION_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => DEFAULT_DELETE_TIMEOUT,
        };

        Ok(Self {
            discord_token,
            bot_user_id,
            delete_timeout,
            forge: ForgeConfig::from_lookup(&lookup),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn token_is_required() {
        let err = BotConfig::from_lookup(lookup(&[("DISCORD_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, BotError::MissingEnv("DISCORD_TOKEN")));
    }

    #[test]
    fn legacy_token_key_is_accepted() {
        let config = BotConfig::from_lookup(lookup(&[("DISCORD_BOT_TOKEN", "abc")])).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.delete_timeout, DEFAULT_DELETE_TIMEOUT);
        assert_eq!(config.bot_user_id, None);
    }

    #[test]
    fn forge_settings_come_from_the_same_source() {
        let config = BotConfig::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("GITHUB_TOKEN", "gh"),
            ("DELETE_REACTION_TIMEOUT_SECS", "30"),
            ("DISCORD_BOT_USER_ID", "42"),
        ]))
        .unwrap();
        assert_eq!(config.forge.github_token.as_deref(), Some("gh"));
        assert_eq!(config.delete_timeout, Duration::from_secs(30));
        assert_eq!(config.bot_user_id, Some(42));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = BotConfig::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DELETE_REACTION_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BotError::InvalidEnv { key: "DELETE_REACTION_TIMEOUT_SECS", .. }));

        let err = BotConfig::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_BOT_USER_ID", "me"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BotError::InvalidEnv { key: "DISCORD_BOT_USER_ID", .. }));
    }
}
