#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("discord error: {0}")]
    Discord(#[from] serenity::Error),
}
