use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use dpcore::{DeltaQueue, ReportSession};
use wire::ConsumerFrame;

use crate::error::Error;
use crate::state::AppState;

/// `GET /stream/{report_name}` — the consumer endpoint.
pub async fn handler(State(state): State<AppState>, Path(report_name): Path<String>, ws: WebSocketUpgrade) -> Response {
    let Some(session) = state.registry().lookup(&report_name) else {
        return Error::from(dpcore::Error::ReportNotFound(report_name)).into_response();
    };

    ws.on_upgrade(move |socket| run(socket, state, report_name, session)).into_response()
}

async fn run(mut socket: WebSocket, state: AppState, report_name: String, mut session: Arc<ReportSession>) {
    let mut queue = attach(&mut socket, &session).await;
    let throttle = Duration::from_secs_f64(state.config().reports.throttle_secs);

    loop {
        if let Some(current) = state.registry().lookup(&report_name)
            && !Arc::ptr_eq(&current, &session)
        {
            session.on_consumer_detached(queue.id(), state.registry(), state.supervisor());
            session = current;
            queue = attach(&mut socket, &session).await;
            continue;
        }

        let deltas = queue.drain();
        if !deltas.is_empty() {
            let values = deltas.into_iter().map(|d| d.into_value()).collect();
            let frame = ConsumerFrame::delta_list(values);
            if socket.send(Message::Text(wire::encode_consumer_frame(&frame).into())).await.is_err() {
                break;
            }
        }

        match tokio::time::timeout(throttle, socket.recv()).await {
            Ok(None) | Ok(Some(Ok(Message::Close(_)))) => break,
            Ok(Some(Ok(_other))) => {
                log::debug!("consumer of '{report_name}' sent an unexpected message; closing");
                break;
            }
            Ok(Some(Err(err))) => {
                log::debug!("consumer connection for '{report_name}' errored: {err}");
                break;
            }
            Err(_elapsed) => continue,
        }
    }

    session.on_consumer_detached(queue.id(), state.registry(), state.supervisor());
}

async fn attach(socket: &mut WebSocket, session: &Arc<ReportSession>) -> DeltaQueue {
    let queue = session.add_consumer_queue();
    let frame = ConsumerFrame::new_report(session.identity.report_id.clone());
    let _ = socket.send(Message::Text(wire::encode_consumer_frame(&frame).into())).await;
    queue
}
