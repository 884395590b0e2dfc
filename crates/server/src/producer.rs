use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use dpcore::{Delta, Error, ReportIdentity, ReportSession};
use wire::ProducerFrame;

use crate::state::AppState;

/// `GET /new/{local_id}/{report_name}` — the producer endpoint.
pub async fn handler(
    State(state): State<AppState>,
    Path((_local_id, report_name)): Path<(String, String)>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run(socket, state, report_name))
}

async fn run(mut socket: WebSocket, state: AppState, report_name: String) {
    let session = match read_new_report(&mut socket, &report_name).await {
        Ok(session) => session,
        Err(err) => {
            log::error!("{err}");
            let _ = socket.send(Message::Close(None)).await;
            state.supervisor().fail_fast();
            return;
        }
    };

    state.supervisor().register_report(session.clone(), state.registry());
    schedule_startup_timeout(&session, &state);

    if let Err(err) = stream_deltas(&mut socket, &session, &report_name).await {
        log::error!("{err}");
        state.supervisor().fail_fast();
        return;
    }

    session.on_producer_finished(state.registry(), state.supervisor());
}

async fn stream_deltas(socket: &mut WebSocket, session: &Arc<ReportSession>, report_name: &str) -> dpcore::Result<()> {
    loop {
        let Some(frame) = socket.recv().await else {
            return Ok(());
        };

        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => return Ok(()),
            Ok(_) => continue,
            Err(err) => {
                log::debug!("producer connection for '{report_name}' errored: {err}");
                return Ok(());
            }
        };

        match wire::decode_producer_frame(&text) {
            Ok(ProducerFrame::DeltaList { deltas }) => {
                for value in deltas {
                    session.enqueue(Delta::new(value));
                }
            }
            Ok(ProducerFrame::NewReport { .. }) => {
                return Err(Error::ProducerProtocolViolation(format!(
                    "producer for '{report_name}' sent a second new_report"
                )));
            }
            Err(err) => {
                return Err(Error::ProducerProtocolViolation(format!(
                    "malformed frame on '{report_name}': {err}"
                )));
            }
        }
    }
}

async fn read_new_report(socket: &mut WebSocket, report_name: &str) -> dpcore::Result<Arc<ReportSession>> {
    let Some(frame) = socket.recv().await else {
        return Err(Error::ProducerProtocolViolation(format!(
            "connection for '{report_name}' closed before new_report"
        )));
    };

    let text = match frame {
        Ok(Message::Text(text)) => text,
        Ok(other) => {
            return Err(Error::ProducerProtocolViolation(format!("expected text frame, got {other:?}")));
        }
        Err(err) => return Err(Error::ProducerProtocolViolation(err.to_string())),
    };

    match wire::decode_producer_frame(&text) {
        Ok(ProducerFrame::NewReport { report_id }) => {
            Ok(Arc::new(ReportSession::new(ReportIdentity::new(report_id, report_name))))
        }
        Ok(ProducerFrame::DeltaList { .. }) => Err(Error::ProducerProtocolViolation(format!(
            "first message on '{report_name}' must be new_report, got delta_list"
        ))),
        Err(err) => Err(Error::ProducerProtocolViolation(err.to_string())),
    }
}

/// Arms event **T**: if no consumer has attached by the time this fires, the
/// session is dropped.
fn schedule_startup_timeout(session: &Arc<ReportSession>, state: &AppState) {
    let session = session.clone();
    let state = state.clone();
    let wait = Duration::from_secs_f64(state.config().reports.wait_for_connection_secs);

    tokio::spawn(async move {
        tokio::time::sleep(wait).await;
        session.on_startup_timeout(state.registry(), state.supervisor());
    });
}
