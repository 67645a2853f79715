//! Outbound side of the chat platform, as seen by the navigation flow.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::cards::keyboard::Keyboard;

/// A failed outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFault {
    /// The platform answered with an error (bad request, forbidden, message not found...).
    #[error("api error: {0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Other(String),
}

/// Operations the bot performs against the chat platform.
///
/// Text and captions are HTML; callers escape user-provided content.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the id of the sent message.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, TransportFault>;

    async fn send_photo(
        &self,
        chat_id: i64,
        photo: &Url,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, TransportFault>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TransportFault>;

    /// Answer a button press so the client stops showing a spinner.
    async fn acknowledge(&self, callback_id: &str) -> Result<(), TransportFault>;
}
