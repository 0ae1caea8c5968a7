//! ChatHub — in-memory conversation rooms for the realtime gateway.
//!
//! ```text
//! WS handler (per connection)
//!       │ join / leave / message / typing / read
//!       ▼
//! ChatHub
//!   └── rooms: conversation_id → broadcast::Sender<ChatBroadcast>
//!         │  (fan-out to every joined connection; sender filtered out
//!         │   by connection id on the receiving side)
//!         ▼
//! WS handler forward tasks → other sockets
//! ```
//!
//! Nothing is persisted; a room exists only while at least one connection
//! is subscribed to it.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel capacity — enough to absorb a burst per room
const BROADCAST_CAPACITY: usize = 256;

/// Frames sent by clients over the socket
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Join { conversation_id: String },
    Leave { conversation_id: String },
    Message { conversation_id: String, body: String },
    Typing { conversation_id: String },
    Read { conversation_id: String, message_id: Option<String> },
}

/// Frames relayed to the other members of a conversation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Message {
        conversation_id: String,
        company_id: String,
        body: String,
        sent_at: i64,
    },
    Typing {
        conversation_id: String,
        company_id: String,
    },
    Read {
        conversation_id: String,
        company_id: String,
        message_id: Option<String>,
    },
    Error {
        code: u16,
        message: String,
    },
}

/// One relayed frame plus the connection that produced it
#[derive(Debug, Clone)]
pub struct ChatBroadcast {
    /// Originating connection — receivers drop their own echoes
    pub sender_conn: i64,
    pub frame: ServerFrame,
}

/// Conversation room registry
#[derive(Clone, Default)]
pub struct ChatHub {
    /// conversation_id → broadcast sender
    rooms: Arc<DashMap<String, broadcast::Sender<ChatBroadcast>>>,
}

impl ChatHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a conversation: subscribe to its broadcast channel, creating the
    /// room on first join.
    pub fn join(&self, conversation_id: &str) -> broadcast::Receiver<ChatBroadcast> {
        self.rooms
            .entry(conversation_id.to_string())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Relay a frame to everyone subscribed to the conversation. The sender's
    /// own receiver filters the echo by `sender_conn`.
    pub fn publish(&self, conversation_id: &str, sender_conn: i64, frame: ServerFrame) {
        if let Some(tx) = self.rooms.get(conversation_id) {
            // send errs when there are no subscribers; safe to ignore
            let _ = tx.send(ChatBroadcast { sender_conn, frame });
        }
    }

    /// Drop the room once the last subscriber is gone. Called after a
    /// connection leaves or disconnects.
    pub fn prune(&self, conversation_id: &str) {
        self.rooms
            .remove_if(conversation_id, |_, tx| tx.receiver_count() == 0);
    }

    #[cfg(test)]
    fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(conversation_id: &str, company_id: &str, body: &str) -> ServerFrame {
        ServerFrame::Message {
            conversation_id: conversation_id.to_string(),
            company_id: company_id.to_string(),
            body: body.to_string(),
            sent_at: 0,
        }
    }

    #[tokio::test]
    async fn joined_member_receives_frames() {
        let hub = ChatHub::new();
        let mut rx = hub.join("conv-1");

        hub.publish("conv-1", 42, message("conv-1", "comp-a", "hello"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.sender_conn, 42);
        match event.frame {
            ServerFrame::Message { body, company_id, .. } => {
                assert_eq!(body, "hello");
                assert_eq!(company_id, "comp-a");
            }
            other => panic!("Expected Message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn frames_stay_in_their_conversation() {
        let hub = ChatHub::new();
        let mut rx_one = hub.join("conv-1");
        let mut rx_two = hub.join("conv-2");

        hub.publish("conv-1", 1, message("conv-1", "comp-a", "only one"));

        assert!(rx_one.try_recv().is_ok());
        assert!(rx_two.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_to_unjoined_conversation_is_noop() {
        let hub = ChatHub::new();
        hub.publish("nobody-home", 1, message("nobody-home", "comp-a", "void"));
        assert_eq!(hub.room_count(), 0);
    }

    #[tokio::test]
    async fn prune_removes_empty_rooms_only() {
        let hub = ChatHub::new();
        let rx = hub.join("conv-1");
        assert_eq!(hub.room_count(), 1);

        // still subscribed: prune keeps the room
        hub.prune("conv-1");
        assert_eq!(hub.room_count(), 1);

        drop(rx);
        hub.prune("conv-1");
        assert_eq!(hub.room_count(), 0);
    }

    #[test]
    fn client_frames_parse() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"join","conversation_id":"c1"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Join { conversation_id } if conversation_id == "c1"));

        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"message","conversation_id":"c1","body":"hi"}"#)
                .unwrap();
        assert!(matches!(frame, ClientFrame::Message { body, .. } if body == "hi"));
    }
}
