//! Outbound message delivery.
//!
//! The notify task talks to a [`Messenger`] rather than the Telegram SDK
//! directly, so fan-out behavior (including the self-healing unsubscribe on
//! permanently unreachable users) is testable without a live bot.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};
use teloxide::{ApiError, RequestError};
use thiserror::Error;

/// Per-recipient delivery failure.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The recipient can never be reached again (blocked the bot, deleted
    /// their account). Triggers unsubscription.
    #[error("recipient unreachable: {0}")]
    Unreachable(String),

    /// Anything else; logged and otherwise swallowed.
    #[error("send failed: {0}")]
    Send(String),
}

impl DeliveryError {
    /// True when the recipient should be unsubscribed.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, DeliveryError::Unreachable(_))
    }
}

impl From<RequestError> for DeliveryError {
    fn from(err: RequestError) -> Self {
        match &err {
            // The 403 family Telegram reports for users who are gone for good.
            RequestError::Api(ApiError::BotBlocked | ApiError::UserDeactivated) => {
                DeliveryError::Unreachable(err.to_string())
            }
            _ => DeliveryError::Send(err.to_string()),
        }
    }
}

/// Sends one rich message to one chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_matches(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), DeliveryError>;
}

/// Production [`Messenger`] over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_matches(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), DeliveryError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_and_deactivated_are_unreachable() {
        let blocked: DeliveryError = RequestError::Api(ApiError::BotBlocked).into();
        assert!(blocked.is_unreachable());

        let deactivated: DeliveryError = RequestError::Api(ApiError::UserDeactivated).into();
        assert!(deactivated.is_unreachable());
    }

    #[test]
    fn test_other_api_errors_are_transient_sends() {
        let err: DeliveryError = RequestError::Api(ApiError::MessageTextIsEmpty).into();
        assert!(!err.is_unreachable());

        let err: DeliveryError = RequestError::Api(ApiError::ChatNotFound).into();
        assert!(!err.is_unreachable());
    }
}
