//! People cards - menu of people, one card per person, back to menu.

pub mod catalog;
pub mod keyboard;
pub mod middleware;
pub mod navigation;
pub mod render;
pub mod telegram;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
mod tests;

pub use catalog::{Catalog, CatalogError, Person};
pub use keyboard::{Keyboard, MenuAction};
pub use middleware::{EventHandler, LoggingMiddleware, Middleware, Next, Pipeline};
pub use navigation::{Event, HandlerError, Navigator, Screen};
pub use render::{RenderError, RenderOutcome};
pub use telegram::TelegramClient;
pub use transport::{Transport, TransportFault};
