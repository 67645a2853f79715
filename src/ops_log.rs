//! Mirrors WARN and ERROR log lines into an operator chat.

use std::sync::Arc;
use std::time::Duration;

use teloxide::utils::html;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::cards::transport::Transport;

const FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const MAX_BATCH: usize = 20;
const MAX_MESSAGE_CHARS: usize = 4000;

pub struct ChatLogLayer {
    tx: mpsc::UnboundedSender<String>,
}

impl ChatLogLayer {
    pub fn new(transport: Arc<dyn Transport>, chat_id: i64) -> Self {
        Self::with_interval(transport, chat_id, FLUSH_INTERVAL)
    }

    /// Must be called inside a tokio runtime.
    pub fn with_interval(transport: Arc<dyn Transport>, chat_id: i64, interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(forward(rx, transport, chat_id, interval));
        Self { tx }
    }
}

async fn forward(
    mut rx: mpsc::UnboundedReceiver<String>,
    transport: Arc<dyn Transport>,
    chat_id: i64,
    interval: Duration,
) {
    let mut buffer: Vec<String> = Vec::new();
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

    loop {
        tokio::select! {
            line = rx.recv() => match line {
                Some(line) => {
                    buffer.push(line);
                    if buffer.len() >= MAX_BATCH {
                        flush(transport.as_ref(), chat_id, &mut buffer).await;
                    }
                }
                None => {
                    flush(transport.as_ref(), chat_id, &mut buffer).await;
                    break;
                }
            },
            _ = ticker.tick() => flush(transport.as_ref(), chat_id, &mut buffer).await,
        }
    }
}

async fn flush(transport: &dyn Transport, chat_id: i64, buffer: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    let text = truncate(&buffer.join("\n"), MAX_MESSAGE_CHARS);
    buffer.clear();
    // Logging here would feed back into this layer.
    if let Err(e) = transport.send_message(chat_id, &html::escape(&text), None).await {
        eprintln!("Failed to send log to Telegram: {e}");
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{} = {:?}", field.name(), value));
        }
    }
}

impl MessageVisitor {
    fn line(self, level: &Level) -> String {
        let prefix = if *level == Level::ERROR { "❌" } else { "⚠️" };
        if self.fields.is_empty() {
            format!("{prefix} {}", self.message)
        } else {
            format!("{prefix} {} ({})", self.message, self.fields.join(", "))
        }
    }
}

impl<S: Subscriber> Layer<S> for ChatLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = event.metadata().level();
        if *level > Level::WARN {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if self.tx.send(visitor.line(level)).is_err() {
            eprintln!("Log channel closed, message dropped");
        }
    }
}
