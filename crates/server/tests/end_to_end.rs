use std::net::SocketAddr;
use std::time::Duration;

use config::Config;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use server::ServeConfig;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use wire::{ConsumerFrame, ProducerFrame};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> (SocketAddr, CancellationToken) {
    let mut config = Config::default();
    config.reports.wait_for_connection_secs = 0.3;
    config.reports.throttle_secs = 0.02;

    let (addr_tx, addr_rx) = tokio::sync::oneshot::channel();
    let shutdown = CancellationToken::new();

    tokio::spawn(server::serve(ServeConfig {
        listen_address: "127.0.0.1:0".parse().unwrap(),
        config,
        shutdown_signal: shutdown.clone(),
        log_filter: "off".to_string(),
        bound_addr_sender: Some(addr_tx),
    }));

    let addr = addr_rx.await.unwrap();
    (addr, shutdown)
}

async fn connect_producer(addr: SocketAddr, local_id: &str, report_name: &str) -> Ws {
    let (ws, _) = connect_async(format!("ws://{addr}/new/{local_id}/{report_name}")).await.unwrap();
    ws
}

async fn connect_consumer(addr: SocketAddr, report_name: &str) -> Ws {
    let (ws, _) = connect_async(format!("ws://{addr}/stream/{report_name}")).await.unwrap();
    ws
}

async fn send_frame(ws: &mut Ws, frame: &ProducerFrame) {
    ws.send(Message::text(serde_json::to_string(frame).unwrap())).await.unwrap();
}

async fn recv_frame(ws: &mut Ws) -> ConsumerFrame {
    match ws.next().await.unwrap().unwrap() {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

async fn recv_frame_timeout(ws: &mut Ws, within: Duration) -> ConsumerFrame {
    tokio::time::timeout(within, recv_frame(ws)).await.expect("timed out waiting for frame")
}

fn delta_list(values: &[i64]) -> ProducerFrame {
    ProducerFrame::DeltaList {
        deltas: values.iter().map(|v| json!(v)).collect(),
    }
}

fn values_of(frame: &ConsumerFrame) -> Vec<Value> {
    match frame {
        ConsumerFrame::DeltaList { deltas } => deltas.clone(),
        other => panic!("expected delta_list, got {other:?}"),
    }
}

#[tokio::test]
async fn single_report_one_viewer() {
    let (addr, _shutdown) = start_server().await;

    let mut producer = connect_producer(addr, "local", "r").await;
    send_frame(&mut producer, &ProducerFrame::NewReport { report_id: "A".to_string() }).await;
    send_frame(&mut producer, &delta_list(&[1, 2, 3])).await;

    let mut viewer = connect_consumer(addr, "r").await;
    assert_eq!(recv_frame(&mut viewer).await, ConsumerFrame::new_report("A"));
    assert_eq!(values_of(&recv_frame(&mut viewer).await), vec![json!(1), json!(2), json!(3)]);

    producer.close(None).await.unwrap();
}

#[tokio::test]
async fn late_viewer_receives_buffered_prefix_then_new_deltas() {
    let (addr, _shutdown) = start_server().await;

    let mut producer = connect_producer(addr, "local", "r").await;
    send_frame(&mut producer, &ProducerFrame::NewReport { report_id: "A".to_string() }).await;
    send_frame(&mut producer, &delta_list(&[1, 2])).await;

    let mut viewer = connect_consumer(addr, "r").await;
    assert_eq!(recv_frame(&mut viewer).await, ConsumerFrame::new_report("A"));
    assert_eq!(values_of(&recv_frame(&mut viewer).await), vec![json!(1), json!(2)]);

    send_frame(&mut producer, &delta_list(&[3])).await;
    let frame = recv_frame_timeout(&mut viewer, Duration::from_millis(200)).await;
    assert_eq!(values_of(&frame), vec![json!(3)]);
}

#[tokio::test]
async fn producer_rotation_mid_stream_migrates_the_viewer() {
    let (addr, _shutdown) = start_server().await;

    let mut p1 = connect_producer(addr, "local", "r").await;
    send_frame(&mut p1, &ProducerFrame::NewReport { report_id: "A".to_string() }).await;
    send_frame(&mut p1, &delta_list(&[1, 2])).await;

    let mut viewer = connect_consumer(addr, "r").await;
    assert_eq!(recv_frame(&mut viewer).await, ConsumerFrame::new_report("A"));
    assert_eq!(values_of(&recv_frame(&mut viewer).await), vec![json!(1), json!(2)]);

    let mut p2 = connect_producer(addr, "local", "r").await;
    send_frame(&mut p2, &ProducerFrame::NewReport { report_id: "B".to_string() }).await;

    assert_eq!(
        recv_frame_timeout(&mut viewer, Duration::from_millis(500)).await,
        ConsumerFrame::new_report("B")
    );

    send_frame(&mut p2, &delta_list(&[9])).await;
    assert_eq!(
        values_of(&recv_frame_timeout(&mut viewer, Duration::from_millis(500)).await),
        vec![json!(9)]
    );

    send_frame(&mut p1, &delta_list(&[3])).await;
    let never = tokio::time::timeout(Duration::from_millis(200), recv_frame(&mut viewer)).await;
    assert!(never.is_err(), "viewer must not observe the superseded producer's deltas");
}

#[tokio::test]
async fn empty_session_times_out_and_shuts_down() {
    let (addr, shutdown) = start_server().await;

    let mut producer = connect_producer(addr, "local", "r").await;
    send_frame(&mut producer, &ProducerFrame::NewReport { report_id: "A".to_string() }).await;
    producer.close(None).await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), shutdown.cancelled())
        .await
        .expect("supervisor should shut down once the abandoned session times out");
}

#[tokio::test]
async fn protocol_violation_shuts_down_the_process() {
    let (addr, shutdown) = start_server().await;

    let mut producer = connect_producer(addr, "local", "r").await;
    send_frame(&mut producer, &delta_list(&[1])).await;

    tokio::time::timeout(Duration::from_secs(2), shutdown.cancelled())
        .await
        .expect("a delta_list before new_report must trigger shutdown");
}

#[tokio::test]
async fn consumer_connecting_to_unknown_report_gets_rejected() {
    let (addr, _shutdown) = start_server().await;

    let result = connect_async(format!("ws://{addr}/stream/nonexistent")).await;
    assert!(result.is_err(), "handshake should fail with 404 before any upgrade");
}

#[tokio::test]
async fn two_viewers_each_see_ordered_deltas_independently() {
    let (addr, _shutdown) = start_server().await;

    let mut producer = connect_producer(addr, "local", "r").await;
    send_frame(&mut producer, &ProducerFrame::NewReport { report_id: "A".to_string() }).await;

    let mut v1 = connect_consumer(addr, "r").await;
    assert_eq!(recv_frame(&mut v1).await, ConsumerFrame::new_report("A"));

    send_frame(&mut producer, &delta_list(&[1])).await;

    let mut v2 = connect_consumer(addr, "r").await;
    assert_eq!(recv_frame(&mut v2).await, ConsumerFrame::new_report("A"));
    assert_eq!(values_of(&recv_frame(&mut v2).await), vec![json!(1)]);

    send_frame(&mut producer, &delta_list(&[2, 3])).await;
    assert_eq!(
        values_of(&recv_frame_timeout(&mut v1, Duration::from_millis(300)).await),
        vec![json!(1), json!(2), json!(3)]
    );
    assert_eq!(
        values_of(&recv_frame_timeout(&mut v2, Duration::from_millis(300)).await),
        vec![json!(2), json!(3)]
    );
}
