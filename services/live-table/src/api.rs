use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State as AxumState,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::{
    actor::Outbound,
    ingress::{Intent, Mailbox},
};

#[derive(Clone)]
pub struct AppState {
    pub mailbox: Mailbox,
    pub broadcaster: broadcast::Sender<Outbound>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/state", get(state_handler))
        .route("/history", get(history_handler))
        .route("/intent", post(intent_handler))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn state_handler(AxumState(state): AxumState<AppState>) -> impl IntoResponse {
    match state.mailbox.snapshot().await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn history_handler(AxumState(state): AxumState<AppState>) -> impl IntoResponse {
    match state.mailbox.history().await {
        Some(history) => Json(history).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Refused intents are a silent no-op: the caller gets the unchanged snapshot back.
async fn intent_handler(
    AxumState(state): AxumState<AppState>,
    Json(intent): Json<Intent>,
) -> impl IntoResponse {
    match state.mailbox.intent(intent).await {
        Some(outcome) => Json(outcome.snapshot).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    AxumState(state): AxumState<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut broadcast_rx = state.broadcaster.subscribe();

    if let Some(snapshot) = state.mailbox.snapshot().await {
        send_outbound(&tx, &Outbound::State { snapshot });
    }

    let write_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let broadcast_task = {
        let tx = tx.clone();
        tokio::spawn(async move {
            loop {
                match broadcast_rx.recv().await {
                    Ok(outbound) => send_outbound(&tx, &outbound),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "socket lagged behind table updates");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    };

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<Intent>(&text) {
                // The resulting state reaches this socket through the broadcast.
                Ok(intent) => {
                    if state.mailbox.intent(intent).await.is_none() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(?err, "invalid inbound message");
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    write_task.abort();
    broadcast_task.abort();
}

fn send_outbound(tx: &mpsc::UnboundedSender<Message>, outbound: &Outbound) {
    if let Ok(payload) = serde_json::to_string(outbound) {
        let _ = tx.send(Message::Text(payload));
    }
}
