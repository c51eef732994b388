//! Telegram command and callback handlers.

use crate::message::{format_island, island_link_keyboard, DETAILS_PREFIX};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use thiserror::Error;
use tracing::{debug, error, warn};
use turnip_core::{WatchPrice, WatchPriceError};
use turnip_store::{StoreError, WatchStore};

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram API error: {0}")]
    Api(#[from] teloxide::RequestError),
}

/// Bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "See the current price")]
    Price,
    #[command(description = "Set price to watch. Usage: /watchprice 500")]
    WatchPrice(String),
    #[command(description = "Stops watching price")]
    ClearPrice,
    #[command(description = "Show a help message")]
    Help,
    #[command(description = "Show the credits of this bot")]
    Credits,
}

const START_TEXT: &str = "Welcome to the Turnip Exchange Notifier Bot!\n\
This bot will notify you when a new island is created with the price you are watching for.\n\
Islands are updated every 10 minutes.\n\
This bot uses, but is not related to, the Turnip.Exchange website: https://turnip.exchange\n\
To start, use /watchprice {price} to set the price you want to watch for.\n\
Every time we find a new island with the price you are watching for, we will send you a message with the island information.\n\n\
Please note that this bot is just a notifier; it will not join the queue for you.";

const CREDITS_TEXT: &str = "This bot uses, but is not related to, the Turnip.Exchange website: \
https://turnip.exchange (please support the creator of Turnip.Exchange).";

const FALLBACK_TEXT: &str =
    "Please use one of the commands available (/help to see the commands or access the menu button)";

const UNKNOWN_CALLBACK_TEXT: &str =
    "Sorry, I couldn't understand your request. Try again using the buttons provided.";

const STORE_ERROR_TEXT: &str = "Something went wrong on our side, please try again later.";

/// Reply for `/price`.
fn price_reply(price: Option<WatchPrice>) -> String {
    match price {
        Some(price) => {
            format!("The current price we are watching is: {price} bells/turnip or higher")
        }
        None => {
            "We are not watching for prices, if you want to start, use /watchprice {price}"
                .to_string()
        }
    }
}

/// Private-chat fallback when a callback arrives without its message:
/// for direct chats the chat id equals the sender's user id.
fn sender_chat_id(user_id: teloxide::types::UserId) -> ChatId {
    ChatId(i64::try_from(user_id.0).unwrap_or_default())
}

/// Reply for an invalid `/watchprice` argument. State is never touched.
fn watch_price_error_reply(err: WatchPriceError) -> &'static str {
    match err {
        WatchPriceError::NotANumber => "Invalid price, please use a number",
        WatchPriceError::TooLow => "Invalid price, please use a number greater than 0",
        WatchPriceError::TooHigh => "Invalid price, the maximum turnip price is 660",
    }
}

/// Telegram bot wrapper owning the injected store.
pub struct TurnipBot {
    bot: Bot,
    store: Arc<dyn WatchStore>,
}

impl TurnipBot {
    /// Create a new bot with the given token.
    pub fn new(token: &str, store: Arc<dyn WatchStore>) -> Self {
        Self {
            bot: Bot::new(token),
            store,
        }
    }

    /// Get the underlying bot for sending messages.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Register the command menu and run the dispatcher until shutdown.
    pub async fn run(self: Arc<Self>) {
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "Failed to register command menu");
        }

        let commands = {
            let this = Arc::clone(&self);
            Update::filter_message().filter_command::<Command>().endpoint(
                move |bot: Bot, msg: Message, cmd: Command| {
                    let this = Arc::clone(&this);
                    async move { this.handle_command(bot, msg, cmd).await }
                },
            )
        };

        let callbacks = {
            let this = Arc::clone(&self);
            Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let this = Arc::clone(&this);
                async move { this.handle_callback(bot, q).await }
            })
        };

        // Anything else gets pointed at /help.
        let fallback = Update::filter_message().endpoint(|bot: Bot, msg: Message| async move {
            bot.send_message(msg.chat.id, FALLBACK_TEXT).await?;
            Ok::<(), TelegramError>(())
        });

        let handler = dptree::entry()
            .branch(commands)
            .branch(callbacks)
            .branch(fallback);

        Dispatcher::builder(self.bot.clone(), handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    async fn handle_command(
        &self,
        bot: Bot,
        msg: Message,
        cmd: Command,
    ) -> Result<(), TelegramError> {
        let chat_id = msg.chat.id;

        match cmd {
            Command::Start => {
                debug!(chat_id = chat_id.0, "Start command received");
                bot.send_message(chat_id, START_TEXT).await?;
            }

            Command::Help => {
                debug!(chat_id = chat_id.0, "Help command received");
                bot.send_message(chat_id, Command::descriptions().to_string())
                    .await?;
            }

            Command::Price => {
                debug!(chat_id = chat_id.0, "Price command received");
                match self.store.watch_price(chat_id.0).await {
                    Ok(price) => {
                        bot.send_message(chat_id, price_reply(price)).await?;
                    }
                    Err(e) => self.report_store_error(&bot, chat_id, e).await?,
                }
            }

            Command::WatchPrice(value) => {
                debug!(chat_id = chat_id.0, "Watchprice command received");
                match value.parse::<WatchPrice>() {
                    Ok(price) => match self.store.set_watch_price(chat_id.0, price).await {
                        Ok(()) => {
                            bot.send_message(
                                chat_id,
                                format!(
                                    "The price we are watching now is: {price} bells/turnip or higher"
                                ),
                            )
                            .await?;
                        }
                        Err(e) => self.report_store_error(&bot, chat_id, e).await?,
                    },
                    Err(e) => {
                        bot.send_message(chat_id, watch_price_error_reply(e)).await?;
                    }
                }
            }

            Command::ClearPrice => {
                debug!(chat_id = chat_id.0, "Clearprice command received");
                match self.store.clear_watch_price(chat_id.0).await {
                    Ok(()) => {
                        bot.send_message(
                            chat_id,
                            "We are no longer watching for prices, if you want to start again, \
                             use /watchprice {price}",
                        )
                        .await?;
                    }
                    Err(e) => self.report_store_error(&bot, chat_id, e).await?,
                }
            }

            Command::Credits => {
                debug!(chat_id = chat_id.0, "Credits command received");
                bot.send_message(chat_id, CREDITS_TEXT).await?;
            }
        }

        Ok(())
    }

    async fn handle_callback(&self, bot: Bot, q: CallbackQuery) -> Result<(), TelegramError> {
        let chat_id = q
            .message
            .as_ref()
            .map(|m| m.chat().id)
            .unwrap_or_else(|| sender_chat_id(q.from.id));

        match q.data.as_deref().and_then(|d| d.strip_prefix(DETAILS_PREFIX)) {
            Some(island_name) => {
                debug!(chat_id = chat_id.0, island_name, "Details callback received");
                match self.store.island(island_name).await {
                    Ok(Some(island)) => {
                        let mut request = bot
                            .send_message(chat_id, format_island(&island, true))
                            .parse_mode(ParseMode::Html);
                        if let Some(keyboard) = island_link_keyboard(&island) {
                            request = request.reply_markup(keyboard);
                        }
                        request.await?;
                    }
                    Ok(None) => {
                        // The snapshot may have rolled over since the button
                        // was sent; best-effort lookup by design.
                        bot.send_message(chat_id, "Island not found").await?;
                    }
                    Err(e) => self.report_store_error(&bot, chat_id, e).await?,
                }
            }
            None => {
                warn!(chat_id = chat_id.0, data = ?q.data, "Unknown callback payload");
                bot.send_message(chat_id, UNKNOWN_CALLBACK_TEXT).await?;
            }
        }

        bot.answer_callback_query(q.id).await?;
        Ok(())
    }

    async fn report_store_error(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        err: StoreError,
    ) -> Result<(), TelegramError> {
        error!(chat_id = chat_id.0, error = %err, "Store operation failed");
        bot.send_message(chat_id, STORE_ERROR_TEXT).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_price_reply_branches() {
        assert_eq!(
            price_reply(Some(WatchPrice::new(420).unwrap())),
            "The current price we are watching is: 420 bells/turnip or higher"
        );
        assert!(price_reply(None).contains("not watching"));
    }

    #[test]
    fn test_watch_price_error_replies() {
        assert_eq!(
            watch_price_error_reply(WatchPriceError::NotANumber),
            "Invalid price, please use a number"
        );
        assert_eq!(
            watch_price_error_reply(WatchPriceError::TooLow),
            "Invalid price, please use a number greater than 0"
        );
        assert_eq!(
            watch_price_error_reply(WatchPriceError::TooHigh),
            "Invalid price, the maximum turnip price is 660"
        );
    }

    #[test]
    fn test_sender_chat_id_never_truncates() {
        use teloxide::types::UserId;

        assert_eq!(sender_chat_id(UserId(777)), ChatId(777));
        // Ids beyond i64 cannot map to a real private chat; fall back to a
        // harmless zero instead of a wrapped negative id.
        assert_eq!(sender_chat_id(UserId(u64::MAX)), ChatId(0));
    }

    #[test]
    fn test_command_menu_covers_all_commands() {
        let descriptions = Command::descriptions().to_string();
        for name in ["/start", "/price", "/watchprice", "/clearprice", "/help", "/credits"] {
            assert!(descriptions.contains(name), "missing {name}");
        }
    }
}
