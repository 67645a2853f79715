//! Handler pipeline with composable middleware.
//!
//! A [`Pipeline`] runs its middleware in registration order. Each middleware
//! gets the event and a [`Next`] continuation; calling `next.run(event)`
//! passes control down the chain and finally to the handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::cards::navigation::{Event, HandlerError, Screen};

/// Handles one inbound event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &Event) -> Result<Screen, HandlerError>;
}

/// Wraps every handler invocation.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn call(&self, event: &Event, next: Next<'_>) -> Result<Screen, HandlerError>;
}

/// The rest of the chain after the current middleware.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    handler: &'a dyn EventHandler,
}

impl Next<'_> {
    pub async fn run(self, event: &Event) -> Result<Screen, HandlerError> {
        match self.chain.split_first() {
            Some((head, rest)) => {
                head.call(event, Next { chain: rest, handler: self.handler }).await
            }
            None => self.handler.handle(event).await,
        }
    }
}

pub struct Pipeline {
    middleware: Vec<Arc<dyn Middleware>>,
    handler: Arc<dyn EventHandler>,
}

impl Pipeline {
    pub fn new(handler: Arc<dyn EventHandler>) -> Self {
        Self { middleware: Vec::new(), handler }
    }

    /// Append a middleware; the first one added runs outermost.
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub async fn dispatch(&self, event: &Event) -> Result<Screen, HandlerError> {
        Next { chain: &self.middleware, handler: self.handler.as_ref() }
            .run(event)
            .await
    }
}

/// Logs start, success and failure of every handler.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn call(&self, event: &Event, next: Next<'_>) -> Result<Screen, HandlerError> {
        let name = event.name();
        debug!("🟡 Handling {} in chat {}", name, event.chat_id());
        match next.run(event).await {
            Ok(screen) => {
                debug!("Handled {} → {:?}", name, screen);
                Ok(screen)
            }
            Err(e) => {
                error!("Handler {} failed in chat {}: {e}", name, event.chat_id());
                Err(e)
            }
        }
    }
}
