use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use geo_puzzle::adapter::protocol::{
    create_command, create_hello, DirectionLower, VariantLower, WireCommand,
};
use geo_puzzle::adapter::{run_server, ServerConfig};
use geo_puzzle::core::{EngineConfig, LevelCatalog};

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send_line(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn send<T: serde::Serialize>(&mut self, msg: &T) {
        let line = serde_json::to_string(msg).unwrap();
        self.send_line(&line).await;
    }

    async fn recv(&mut self) -> serde_json::Value {
        let line = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    /// Send a command and return its (ack, observation) pair
    async fn command(
        &mut self,
        seq: u64,
        command: WireCommand,
    ) -> (serde_json::Value, serde_json::Value) {
        self.send(&create_command(seq, command)).await;
        let ack = self.recv().await;
        let obs = self.recv().await;
        assert_eq!(ack["type"], "ack");
        assert_eq!(ack["seq"], seq);
        assert_eq!(obs["type"], "observation");
        assert_eq!(obs["seq"], seq);
        (ack, obs)
    }
}

async fn start_server() -> SocketAddr {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        protocol_version: "1.0.0".to_string(),
    };
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(
            config,
            Arc::new(LevelCatalog::builtin()),
            EngineConfig::default(),
            Some(ready_tx),
        )
        .await;
    });

    tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped")
}

fn select(block_id: u32) -> WireCommand {
    WireCommand::Select { block_id }
}

fn step(direction: DirectionLower) -> WireCommand {
    WireCommand::Move { direction }
}

#[tokio::test]
async fn adapter_hello_command_ack_and_observation() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    client.send(&create_hello(1, "e2e-test", "1.0.0")).await;
    let welcome = client.recv().await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["protocol_version"], "1.0.0");
    assert_eq!(welcome["active_variant"], "slide");

    let (ack, obs) = client.command(2, select(1)).await;
    assert_eq!(ack["outcome"]["status"], "applied");
    assert_eq!(obs["slide"]["selection"], 1);
    assert_eq!(obs["slide"]["moves_left"], 10);

    let (ack, obs) = client.command(3, step(DirectionLower::Right)).await;
    assert_eq!(ack["outcome"]["status"], "applied");
    assert_eq!(obs["slide"]["moves_left"], 9);
    let target = obs["slide"]["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["is_target"] == true)
        .cloned()
        .unwrap();
    assert_eq!(target["x"], 1);
    assert_eq!(target["y"], 2);
}

#[tokio::test]
async fn adapter_plays_first_level_to_completion() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;
    client.send(&create_hello(1, "e2e-test", "1.0.0")).await;
    client.recv().await;

    client.command(2, select(1)).await;
    let (ack, _) = client.command(3, step(DirectionLower::Right)).await;
    assert_eq!(ack["outcome"]["status"], "applied");

    let (ack, obs) = client.command(4, step(DirectionLower::Right)).await;
    assert_eq!(ack["outcome"]["status"], "rejected");
    assert_eq!(ack["outcome"]["reason"], "blocked");
    assert_eq!(ack["outcome"]["blocked_by"], 2);
    assert_eq!(obs["slide"]["moves_left"], 9);

    client.command(5, select(2)).await;
    client.command(6, step(DirectionLower::Up)).await;
    client.command(7, select(1)).await;
    client.command(8, step(DirectionLower::Right)).await;
    client.command(9, step(DirectionLower::Right)).await;

    let (ack, obs) = client.command(10, step(DirectionLower::Right)).await;
    assert_eq!(ack["outcome"]["status"], "levelComplete");
    assert_eq!(ack["outcome"]["level"], 2);
    assert_eq!(obs["slide"]["level"], 2);
    assert_eq!(obs["slide"]["moves_left"], 12);
    assert!(obs["slide"].get("selection").is_none());
}

#[tokio::test]
async fn adapter_rejects_commands_before_handshake() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    client.send(&create_command(1, select(1))).await;
    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "handshake_required");

    client.send_line("not json").await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_command");

    client.send(&create_hello(2, "e2e-test", "9.0.0")).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "protocol_mismatch");

    client.send(&create_hello(3, "e2e-test", "1.2.0")).await;
    assert_eq!(client.recv().await["type"], "welcome");

    client.send(&create_command(3, select(1))).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "out_of_order");
    assert_eq!(err["seq"], 3);
}

#[tokio::test]
async fn adapter_sessions_are_independent_per_connection() {
    let addr = start_server().await;

    let mut first = Client::connect(addr).await;
    first.send(&create_hello(1, "first", "1.0.0")).await;
    first.recv().await;
    let switch = WireCommand::SwitchVariant {
        variant: VariantLower::Shape,
    };
    first.command(2, switch).await;
    let (ack, obs) = first.command(3, WireCommand::Expand).await;
    assert_eq!(ack["outcome"]["status"], "applied");
    assert_eq!(obs["variant"], "shape");
    assert_eq!(obs["shape"]["moves_left"], 4);
    assert_eq!(obs["shape"]["pieces"][0]["size"], "large");

    let mut second = Client::connect(addr).await;
    second.send(&create_hello(1, "second", "1.0.0")).await;
    second.recv().await;
    second.send_line(r#"{"type":"observe","seq":2,"ts":0}"#).await;
    let obs = second.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["variant"], "slide");
    assert_eq!(obs["shape"]["moves_left"], 5);
    assert_eq!(obs["shape"]["pieces"][0]["size"], "medium");
}
