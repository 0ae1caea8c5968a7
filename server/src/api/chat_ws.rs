//! Chat WebSocket endpoint
//!
//! GET /api/chat/ws?company_id=<id>
//!
//! Protocol (JSON text frames):
//! - Client → Server: ClientFrame (join, leave, message, typing, read)
//! - Server → Client: ServerFrame (message, typing, read, error)
//!
//! Frames are relayed only within conversations the connection has joined,
//! and never echoed back to their sender.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::util::{now_millis, snowflake_id};
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Duration;

use crate::chat::{ChatBroadcast, ClientFrame, ServerFrame};
use crate::state::AppState;

/// Maximum concurrent chat connections per company
const MAX_CHAT_WS_PER_COMPANY: usize = 5;

/// Maximum conversations a single connection may join
const MAX_JOINED_CONVERSATIONS: usize = 64;

#[derive(Deserialize)]
pub struct ChatQuery {
    company_id: String,
}

/// GET /api/chat/ws?company_id=<id>
pub async fn handle_chat_ws(
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let company_id = query.company_id.trim().to_owned();
    if company_id.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "company_id is required",
        ));
    }

    // Connection cap, atomic increment to avoid TOCTOU between check and add
    {
        let counter = state
            .chat_connections
            .entry(company_id.clone())
            .or_insert_with(|| std::sync::atomic::AtomicUsize::new(0));
        let prev = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if prev >= MAX_CHAT_WS_PER_COMPANY {
            counter.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
            return Err(AppError::with_message(
                ErrorCode::ConnectionLimitReached,
                format!("Too many chat connections ({prev}/{MAX_CHAT_WS_PER_COMPANY})"),
            ));
        }
    } // drop RefMut before moving state into on_upgrade closure

    Ok(ws.on_upgrade(move |socket| chat_session(socket, state, company_id)))
}

async fn chat_session(socket: WebSocket, state: AppState, company_id: String) {
    let conn_id = snowflake_id();
    let (mut sink, mut stream) = socket.split();

    tracing::info!(company_id = %company_id, conn_id, "Chat WS connected");

    // Forward tasks push relayed frames here; the session loop owns the sink.
    let (out_tx, mut out_rx) = mpsc::channel::<String>(64);

    // conversation_id → forward task
    let mut joined: HashMap<String, tokio::task::JoinHandle<()>> = HashMap::new();

    let mut ping_interval = tokio::time::interval(Duration::from_secs(30));
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            relayed = out_rx.recv() => {
                let Some(text) = relayed else { break };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }

            incoming = stream.next() => {
                let frame = match incoming {
                    Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientFrame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::debug!(conn_id, "Unparseable chat frame: {e}");
                            send_error(&mut sink, ErrorCode::InvalidFormat).await;
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue, // ping/pong/binary
                    Some(Err(e)) => {
                        tracing::debug!(conn_id, "Chat WS error: {e}");
                        break;
                    }
                };

                handle_frame(&state, &company_id, conn_id, frame, &mut joined, &out_tx, &mut sink)
                    .await;
            }
        }
    }

    // Cleanup: stop forward tasks, prune empty rooms, release the slot
    for (conversation_id, handle) in joined {
        handle.abort();
        state.chat.prune(&conversation_id);
    }
    if let Some(counter) = state.chat_connections.get(&company_id) {
        counter.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
    }

    tracing::info!(company_id = %company_id, conn_id, "Chat WS disconnected");
}

async fn handle_frame(
    state: &AppState,
    company_id: &str,
    conn_id: i64,
    frame: ClientFrame,
    joined: &mut HashMap<String, tokio::task::JoinHandle<()>>,
    out_tx: &mpsc::Sender<String>,
    sink: &mut SplitSink<WebSocket, Message>,
) {
    match frame {
        ClientFrame::Join { conversation_id } => {
            if joined.contains_key(&conversation_id) {
                return;
            }
            if joined.len() >= MAX_JOINED_CONVERSATIONS {
                send_error(sink, ErrorCode::ResourceLimitExceeded).await;
                return;
            }
            let rx = state.chat.join(&conversation_id);
            let handle = tokio::spawn(forward_room(rx, conn_id, out_tx.clone()));
            joined.insert(conversation_id, handle);
        }

        ClientFrame::Leave { conversation_id } => {
            if let Some(handle) = joined.remove(&conversation_id) {
                handle.abort();
                state.chat.prune(&conversation_id);
            }
        }

        ClientFrame::Message { conversation_id, body } => {
            if !joined.contains_key(&conversation_id) {
                send_error(sink, ErrorCode::ConversationNotJoined).await;
                return;
            }
            let frame = ServerFrame::Message {
                conversation_id: conversation_id.clone(),
                company_id: company_id.to_owned(),
                body,
                sent_at: now_millis(),
            };
            state.chat.publish(&conversation_id, conn_id, frame);
        }

        ClientFrame::Typing { conversation_id } => {
            if !joined.contains_key(&conversation_id) {
                send_error(sink, ErrorCode::ConversationNotJoined).await;
                return;
            }
            let frame = ServerFrame::Typing {
                conversation_id: conversation_id.clone(),
                company_id: company_id.to_owned(),
            };
            state.chat.publish(&conversation_id, conn_id, frame);
        }

        ClientFrame::Read { conversation_id, message_id } => {
            if !joined.contains_key(&conversation_id) {
                send_error(sink, ErrorCode::ConversationNotJoined).await;
                return;
            }
            let frame = ServerFrame::Read {
                conversation_id: conversation_id.clone(),
                company_id: company_id.to_owned(),
                message_id,
            };
            state.chat.publish(&conversation_id, conn_id, frame);
        }
    }
}

/// Forward room broadcasts to the session's outbound channel, dropping the
/// sender's own echoes.
async fn forward_room(
    mut rx: broadcast::Receiver<ChatBroadcast>,
    conn_id: i64,
    out_tx: mpsc::Sender<String>,
) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if event.sender_conn == conn_id {
                    continue;
                }
                let Ok(text) = serde_json::to_string(&event.frame) else {
                    continue;
                };
                if out_tx.send(text).await.is_err() {
                    break; // session closed
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(conn_id, skipped, "Chat receiver lagged, frames dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn send_error(sink: &mut SplitSink<WebSocket, Message>, code: ErrorCode) {
    let frame = ServerFrame::Error {
        code: code.code(),
        message: code.message().to_owned(),
    };
    if let Ok(text) = serde_json::to_string(&frame) {
        let _ = sink.send(Message::Text(text.into())).await;
    }
}
