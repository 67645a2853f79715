//! Person cards with a degrading fallback chain.
//!
//! A card is tried as a photo with caption, then as a text message, then as
//! a short notice naming the person. The first attempt the transport accepts
//! wins; if all of them fail the last fault is returned.

use teloxide::utils::html;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::cards::catalog::Person;
use crate::cards::keyboard::back_menu;
use crate::cards::transport::{Transport, TransportFault};

/// Telegram's limit for photo captions, counted on the text left after
/// entity parsing.
pub const MAX_CAPTION_CHARS: usize = 1024;

pub const NOTICE_PREFIX: &str = "Failed to load card: ";

/// One way of showing a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Photo(Url),
    Text,
    Notice,
}

impl Attempt {
    pub fn kind(&self) -> &'static str {
        match self {
            Attempt::Photo(_) => "photo",
            Attempt::Text => "text",
            Attempt::Notice => "notice",
        }
    }
}

/// The attempt that got through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub attempt: Attempt,
    pub message_id: i64,
    /// Attempts that failed before this one.
    pub failed_attempts: usize,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("all {attempts} attempts to show card '{key}' failed, last: {last}")]
    Exhausted {
        key: String,
        attempts: usize,
        #[source]
        last: TransportFault,
    },
}

/// Bold name, blank line, bio. Both are escaped.
pub fn caption(person: &Person) -> String {
    format!("<b>{}</b>\n\n{}", html::escape(&person.name), html::escape(&person.bio))
}

/// Length of [`caption`] as Telegram counts it: tags and escapes excluded.
pub fn visible_caption_chars(person: &Person) -> usize {
    person.name.chars().count() + 2 + person.bio.chars().count()
}

/// Last-resort text: escaped name, no formatting.
pub fn notice(person: &Person) -> String {
    format!("{NOTICE_PREFIX}{}", html::escape(&person.name))
}

/// Accepts only absolute http(s) URLs with a host.
pub fn photo_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    let web = matches!(url.scheme(), "http" | "https");
    (web && url.host_str().is_some_and(|h| !h.is_empty())).then_some(url)
}

/// Ordered attempts for a card, richest first.
pub fn fallback_chain(person: &Person) -> Vec<Attempt> {
    let mut chain = Vec::with_capacity(3);
    match photo_url(&person.photo_url) {
        Some(url) if visible_caption_chars(person) <= MAX_CAPTION_CHARS => chain.push(Attempt::Photo(url)),
        Some(_) => warn!("Caption for '{}' too long for a photo, sending text", person.key),
        None => warn!("No valid photo URL for '{}', sending text", person.key),
    }
    chain.push(Attempt::Text);
    chain.push(Attempt::Notice);
    chain
}

/// Send the card for `person` to `chat_id`, degrading on failure.
///
/// Produces exactly one message on success and none on error.
pub async fn render(
    transport: &dyn Transport,
    chat_id: i64,
    person: &Person,
) -> Result<RenderOutcome, RenderError> {
    info!("Sending card for '{}' to chat {}", person.name, chat_id);

    let caption = caption(person);
    let keyboard = back_menu();
    let chain = fallback_chain(person);
    let attempts = chain.len();

    let mut last = None;
    for (failed_attempts, attempt) in chain.into_iter().enumerate() {
        let result = match &attempt {
            Attempt::Photo(url) => transport.send_photo(chat_id, url, &caption, Some(&keyboard)).await,
            Attempt::Text => transport.send_message(chat_id, &caption, Some(&keyboard)).await,
            Attempt::Notice => {
                transport.send_message(chat_id, &notice(person), Some(&keyboard)).await
            }
        };

        match result {
            Ok(message_id) => {
                info!("Card for '{}' sent as {}", person.key, attempt.kind());
                return Ok(RenderOutcome { attempt, message_id, failed_attempts });
            }
            Err(e) => {
                warn!("Card for '{}' failed as {}: {e}", person.key, attempt.kind());
                last = Some(e);
            }
        }
    }

    let last = last.unwrap_or_else(|| TransportFault::Other("no render attempts".to_string()));
    error!("Could not show card for '{}': {last}", person.key);
    Err(RenderError::Exhausted { key: person.key.clone(), attempts, last })
}
