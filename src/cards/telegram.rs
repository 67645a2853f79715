//! Telegram transport using teloxide.

use async_trait::async_trait;
use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode,
};
use tracing::{debug, info};
use url::Url;

use crate::cards::keyboard::Keyboard;
use crate::cards::transport::{Transport, TransportFault};

impl From<RequestError> for TransportFault {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Api(api) => TransportFault::Api(api.to_string()),
            RequestError::Network(err) => TransportFault::Network(err.to_string()),
            other => TransportFault::Other(other.to_string()),
        }
    }
}

fn inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows().iter().map(|row| {
        row.iter()
            .map(|action| InlineKeyboardButton::callback(action.label.clone(), action.action_id.clone()))
    }))
}

/// Telegram API client.
#[derive(Clone)]
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, TransportFault> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html);

        if let Some(keyboard) = keyboard {
            request = request.reply_markup(inline_markup(keyboard));
        }

        let msg = request.await?;
        debug!("Sent message {} to chat {}", msg.id.0, chat_id);
        Ok(msg.id.0 as i64)
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo: &Url,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, TransportFault> {
        info!("📷 Sending photo {} to chat {}", photo, chat_id);

        let mut request = self
            .bot
            .send_photo(ChatId(chat_id), InputFile::url(photo.clone()))
            .caption(caption)
            .parse_mode(ParseMode::Html);

        if let Some(keyboard) = keyboard {
            request = request.reply_markup(inline_markup(keyboard));
        }

        let msg = request.await?;
        Ok(msg.id.0 as i64)
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TransportFault> {
        info!("🗑️ Deleting message {} in chat {}", message_id, chat_id);

        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id as i32))
            .await?;
        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), TransportFault> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .await?;
        Ok(())
    }
}
