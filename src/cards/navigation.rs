//! Menu ↔ card navigation.
//!
//! Screens are not stored per user. Each event carries the message it came
//! from, and a transition replaces that message: delete it, send the next one.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::cards::catalog::Catalog;
use crate::cards::keyboard::{Action, BACK_ACTION, PERSON_PREFIX, main_menu};
use crate::cards::middleware::EventHandler;
use crate::cards::render::{self, RenderError};
use crate::cards::transport::{Transport, TransportFault};

pub const DEFAULT_MENU_TITLE: &str = "OUR HEROES";
pub const NOT_FOUND_TEXT: &str = "Person not found";

/// Inbound events, already stripped of platform types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start {
        chat_id: i64,
        user_id: i64,
    },
    Select {
        callback_id: String,
        chat_id: i64,
        message_id: i64,
        action_id: String,
    },
    Back {
        callback_id: String,
        chat_id: i64,
        message_id: i64,
    },
}

impl Event {
    /// Classify a button press. `None` for data this bot does not handle.
    pub fn from_callback(callback_id: String, chat_id: i64, message_id: i64, data: &str) -> Option<Self> {
        if data == BACK_ACTION {
            Some(Event::Back { callback_id, chat_id, message_id })
        } else if data.starts_with(PERSON_PREFIX) {
            Some(Event::Select { callback_id, chat_id, message_id, action_id: data.to_string() })
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::Start { .. } => "start",
            Event::Select { .. } => "select_person",
            Event::Back { .. } => "back",
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            Event::Start { chat_id, .. }
            | Event::Select { chat_id, .. }
            | Event::Back { chat_id, .. } => *chat_id,
        }
    }
}

/// What the user is looking at after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Detail,
    Unchanged,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("transport fault: {0}")]
    Transport(#[from] TransportFault),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Drives the two screens over an injected transport.
pub struct Navigator {
    catalog: Arc<Catalog>,
    transport: Arc<dyn Transport>,
    menu_title: String,
}

impl Navigator {
    pub fn new(catalog: Arc<Catalog>, transport: Arc<dyn Transport>) -> Self {
        Self {
            catalog,
            transport,
            menu_title: DEFAULT_MENU_TITLE.to_string(),
        }
    }

    pub fn with_menu_title(mut self, title: impl Into<String>) -> Self {
        self.menu_title = title.into();
        self
    }

    async fn start(&self, chat_id: i64, user_id: i64) -> Result<Screen, HandlerError> {
        info!("🚀 /start from user {} in chat {}", user_id, chat_id);
        self.send_main_menu(chat_id).await?;
        Ok(Screen::MainMenu)
    }

    async fn select(
        &self,
        callback_id: &str,
        chat_id: i64,
        message_id: i64,
        action_id: &str,
    ) -> Result<Screen, HandlerError> {
        self.acknowledge(callback_id).await;

        let person = match Action::parse(action_id) {
            Some(Action::Person(key)) => self.catalog.get(key),
            _ => None,
        };
        let Some(person) = person else {
            warn!("Person not found for action {:?}", action_id);
            self.transport.send_message(chat_id, NOT_FOUND_TEXT, None).await?;
            return Ok(Screen::Unchanged);
        };

        self.discard(chat_id, message_id).await;
        render::render(self.transport.as_ref(), chat_id, person).await?;
        Ok(Screen::Detail)
    }

    async fn back(&self, callback_id: &str, chat_id: i64, message_id: i64) -> Result<Screen, HandlerError> {
        self.acknowledge(callback_id).await;
        self.discard(chat_id, message_id).await;
        self.send_main_menu(chat_id).await?;
        Ok(Screen::MainMenu)
    }

    async fn send_main_menu(&self, chat_id: i64) -> Result<i64, TransportFault> {
        let keyboard = main_menu(&self.catalog);
        let message_id = self
            .transport
            .send_message(chat_id, &teloxide::utils::html::escape(&self.menu_title), Some(&keyboard))
            .await?;
        info!("Main menu sent to chat {}", chat_id);
        Ok(message_id)
    }

    /// Best-effort: the press still works if this fails.
    async fn acknowledge(&self, callback_id: &str) {
        if let Err(e) = self.transport.acknowledge(callback_id).await {
            warn!("Failed to answer callback {}: {e}", callback_id);
        }
    }

    /// Best-effort delete of the message being replaced.
    async fn discard(&self, chat_id: i64, message_id: i64) {
        if let Err(e) = self.transport.delete_message(chat_id, message_id).await {
            warn!("Failed to delete message {} in chat {}: {e}", message_id, chat_id);
        }
    }
}

#[async_trait]
impl EventHandler for Navigator {
    async fn handle(&self, event: &Event) -> Result<Screen, HandlerError> {
        match event {
            Event::Start { chat_id, user_id } => self.start(*chat_id, *user_id).await,
            Event::Select { callback_id, chat_id, message_id, action_id } => {
                self.select(callback_id, *chat_id, *message_id, action_id).await
            }
            Event::Back { callback_id, chat_id, message_id } => {
                self.back(callback_id, *chat_id, *message_id).await
            }
        }
    }
}
