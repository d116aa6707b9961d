//! End-to-end tests for the `/ws` relay path over a real TCP listener.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use mentorlink_config::AppConfig;
use mentorlink_gateway::{create_router, GatewayState};
use mentorlink_runtime::BackendServices;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    _db_dir: TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        let db_dir = TempDir::new().expect("create temp dir");
        let db_path = db_dir.path().join("mentorlink-ws-test.db");

        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}", db_path.to_string_lossy());
        config.database.max_connections = 5;

        let services = BackendServices::initialise(&config)
            .await
            .expect("initialise backend services");

        let state = GatewayState::new(services.db_pool, config.storage, &config.relay);
        let router = create_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve test app");
        });

        Self {
            addr,
            _db_dir: db_dir,
        }
    }

    async fn connect(&self) -> WsClient {
        let url = format!("ws://{}/ws", self.addr);
        let (client, _response) = connect_async(url).await.expect("connect websocket");
        client
    }

    async fn connect_as(&self, user_id: &str) -> WsClient {
        let mut client = self.connect().await;
        send_json(&mut client, json!({"type": "join", "user_id": user_id})).await;
        // join has no acknowledgement; give the server a moment to register.
        tokio::time::sleep(Duration::from_millis(50)).await;
        client
    }
}

async fn send_json(client: &mut WsClient, value: Value) {
    let text = serde_json::to_string(&value).expect("serialize client event");
    client
        .send(Message::Text(text))
        .await
        .expect("send websocket frame");
}

async fn recv_json(client: &mut WsClient) -> Value {
    let frame = tokio::time::timeout(Duration::from_secs(2), client.next())
        .await
        .expect("timed out waiting for server event")
        .expect("websocket stream ended")
        .expect("websocket frame error");
    match frame {
        Message::Text(text) => serde_json::from_str(&text).expect("parse server event"),
        other => panic!("unexpected frame: {other:?}"),
    }
}

async fn assert_silent(client: &mut WsClient) {
    let result = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "expected no delivery, got {result:?}");
}

#[tokio::test]
async fn message_reaches_the_joined_receiver() {
    let server = TestServer::spawn().await;
    let mut sender = server.connect_as("u1").await;
    let mut receiver = server.connect_as("u2").await;

    send_json(
        &mut sender,
        json!({
            "type": "send_message",
            "message": {
                "sender_id": "u1",
                "receiver_id": "u2",
                "content": "hello sam",
                "client_tag": "tag-42"
            }
        }),
    )
    .await;

    let event = recv_json(&mut receiver).await;
    assert_eq!(event["type"], "receive_message");
    assert_eq!(event["message"]["sender_id"], "u1");
    assert_eq!(event["message"]["content"], "hello sam");
    assert_eq!(event["message"]["client_tag"], "tag-42");

    assert_silent(&mut sender).await;
}

#[tokio::test]
async fn payload_without_content_is_still_delivered() {
    let server = TestServer::spawn().await;
    let mut sender = server.connect_as("u1").await;
    let mut receiver = server.connect_as("u2").await;

    send_json(
        &mut sender,
        json!({
            "type": "send_message",
            "message": {"sender_id": "u1", "receiver_id": "u2"}
        }),
    )
    .await;

    let event = recv_json(&mut receiver).await;
    assert_eq!(event["type"], "receive_message");
    assert_eq!(event["message"]["sender_id"], "u1");
    assert_eq!(event["message"].get("content"), None);

    send_json(
        &mut sender,
        json!({
            "type": "send_message",
            "message": {"sender_id": "u1", "receiver_id": "u2", "content": 42}
        }),
    )
    .await;

    let event = recv_json(&mut receiver).await;
    assert_eq!(event["message"]["content"], 42);
}

#[tokio::test]
async fn message_to_an_offline_receiver_is_dropped() {
    let server = TestServer::spawn().await;
    let mut sender = server.connect_as("u1").await;
    let mut bystander = server.connect_as("u2").await;

    send_json(
        &mut sender,
        json!({
            "type": "send_message",
            "message": {"sender_id": "u1", "receiver_id": "ghost", "content": "anyone?"}
        }),
    )
    .await;

    assert_silent(&mut sender).await;
    assert_silent(&mut bystander).await;
}

#[tokio::test]
async fn reconnect_takes_over_delivery_for_the_user() {
    let server = TestServer::spawn().await;
    let mut sender = server.connect_as("u1").await;
    let mut stale = server.connect_as("u2").await;
    let mut current = server.connect_as("u2").await;

    send_json(
        &mut sender,
        json!({
            "type": "send_message",
            "message": {"sender_id": "u1", "receiver_id": "u2", "content": "latest wins"}
        }),
    )
    .await;

    let event = recv_json(&mut current).await;
    assert_eq!(event["message"]["content"], "latest wins");
    assert_silent(&mut stale).await;
}

#[tokio::test]
async fn disconnect_clears_presence_for_the_user() {
    let server = TestServer::spawn().await;
    let mut sender = server.connect_as("u1").await;

    let mut receiver = server.connect_as("u2").await;
    receiver.close(None).await.expect("close websocket");
    drop(receiver);
    tokio::time::sleep(Duration::from_millis(50)).await;

    send_json(
        &mut sender,
        json!({
            "type": "send_message",
            "message": {"sender_id": "u1", "receiver_id": "u2", "content": "too late"}
        }),
    )
    .await;

    assert_silent(&mut sender).await;
}

#[tokio::test]
async fn malformed_frames_do_not_kill_the_session() {
    let server = TestServer::spawn().await;
    let mut sender = server.connect_as("u1").await;
    let mut receiver = server.connect_as("u2").await;

    sender
        .send(Message::Text("this is not json".to_string()))
        .await
        .expect("send garbage frame");

    send_json(
        &mut sender,
        json!({
            "type": "send_message",
            "message": {"sender_id": "u1", "receiver_id": "u2", "content": "still alive"}
        }),
    )
    .await;

    let event = recv_json(&mut receiver).await;
    assert_eq!(event["message"]["content"], "still alive");
}
