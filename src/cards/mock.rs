//! Recording transport for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::cards::keyboard::Keyboard;
use crate::cards::transport::{Transport, TransportFault};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Message { chat_id: i64, text: String, keyboard: Option<Keyboard> },
    Photo { chat_id: i64, url: String, caption: String, keyboard: Option<Keyboard> },
    Delete { chat_id: i64, message_id: i64 },
    Ack { callback_id: String },
}

#[derive(Debug, Default)]
struct State {
    /// Every call, with whether it succeeded.
    log: Vec<(Call, bool)>,
    next_message_id: i64,
    failing_messages: usize,
    fail_photos: bool,
    fail_deletes: bool,
    fail_acks: bool,
}

/// Transport that records calls and fails on demand.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<State>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n` `send_message` calls fail.
    pub fn fail_next_messages(&self, n: usize) {
        self.state.lock().unwrap().failing_messages = n;
    }

    pub fn fail_photos(&self) {
        self.state.lock().unwrap().fail_photos = true;
    }

    pub fn fail_deletes(&self) {
        self.state.lock().unwrap().fail_deletes = true;
    }

    pub fn fail_acks(&self) {
        self.state.lock().unwrap().fail_acks = true;
    }

    /// Every attempted call, including failed ones.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().log.iter().map(|(c, _)| c.clone()).collect()
    }

    /// Calls that succeeded.
    pub fn delivered(&self) -> Vec<Call> {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|(_, ok)| *ok)
            .map(|(c, _)| c.clone())
            .collect()
    }

    /// Successfully sent messages and photos.
    pub fn sent(&self) -> Vec<Call> {
        self.delivered()
            .into_iter()
            .filter(|c| matches!(c, Call::Message { .. } | Call::Photo { .. }))
            .collect()
    }

    pub fn deletes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| matches!(c, Call::Delete { .. })).collect()
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().log.clear();
    }

    fn record(&self, call: Call, fail: bool) -> Result<i64, TransportFault> {
        let mut state = self.state.lock().unwrap();
        state.log.push((call, !fail));
        if fail {
            return Err(TransportFault::Api("Bad Request: mocked failure".to_string()));
        }
        state.next_message_id += 1;
        Ok(100 + state.next_message_id)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, TransportFault> {
        let fail = {
            let mut state = self.state.lock().unwrap();
            let fail = state.failing_messages > 0;
            state.failing_messages = state.failing_messages.saturating_sub(1);
            fail
        };
        let call = Call::Message { chat_id, text: text.to_string(), keyboard: keyboard.cloned() };
        self.record(call, fail)
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo: &Url,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<i64, TransportFault> {
        let fail = self.state.lock().unwrap().fail_photos;
        let call = Call::Photo {
            chat_id,
            url: photo.to_string(),
            caption: caption.to_string(),
            keyboard: keyboard.cloned(),
        };
        self.record(call, fail)
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TransportFault> {
        let fail = self.state.lock().unwrap().fail_deletes;
        self.record(Call::Delete { chat_id, message_id }, fail).map(|_| ())
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), TransportFault> {
        let fail = self.state.lock().unwrap().fail_acks;
        self.record(Call::Ack { callback_id: callback_id.to_string() }, fail).map(|_| ())
    }
}
