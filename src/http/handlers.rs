use super::state::AppState;
use crate::protocol::{ClientFrame, OutboundMessage};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use bytes::Bytes;
use futures::{future, SinkExt, StreamExt};
use tracing::debug;

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET <stream_path>
/// Upgrade to a WebSocket and run one relay session on it
pub async fn stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let session = state.new_session();
    let session_id = session.id();
    let (ws_tx, ws_rx) = socket.split();

    let inbound = ws_rx.filter_map(|message| future::ready(client_frame(message)));
    let outbound = ws_tx.with(|message: OutboundMessage| {
        future::ready(
            serde_json::to_string(&message)
                .map(Message::Text)
                .map_err(axum::Error::new),
        )
    });

    let stats = session.run(inbound, Box::pin(outbound)).await;
    debug!(session = %session_id, "Socket handler finished: {:?}", stats);
}

/// Map a WebSocket message onto the relay's input, skipping control frames
fn client_frame(message: Result<Message, axum::Error>) -> Option<ClientFrame> {
    match message {
        Ok(Message::Text(text)) => Some(ClientFrame::Text(text)),
        Ok(Message::Binary(data)) => Some(ClientFrame::Audio(Bytes::from(data))),
        Ok(Message::Close(_)) => Some(ClientFrame::Close),
        Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => None,
        Err(e) => {
            debug!("WebSocket receive error: {}", e);
            Some(ClientFrame::Close)
        }
    }
}
