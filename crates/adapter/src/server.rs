//! TCP server for remote puzzle clients
//!
//! Every accepted connection gets its own [`Session`]; sessions are never
//! shared between tasks. A connection is driven by its sequential read loop,
//! so commands on one connection are applied strictly in arrival order.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::core::{EngineConfig, LevelCatalog, Session};
use crate::protocol::*;
use crate::types::Outcome;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
}

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;
pub const PROTOCOL_VERSION: &str = "1.0.0";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create from `GEO_PUZZLE_HOST` / `GEO_PUZZLE_PORT`, defaulting on absent or invalid values
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] over an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("GEO_PUZZLE_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("GEO_PUZZLE_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            host,
            port,
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Any message the server writes to a client
#[derive(Debug, Clone)]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Observation(ObservationMessage),
    Error(ErrorMessage),
}

impl ServerMessage {
    /// Serialize as one JSON line (including the trailing newline) into `buf`
    pub fn write_line(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            ServerMessage::Welcome(m) => serde_json::to_writer(&mut *buf, m)?,
            ServerMessage::Ack(m) => serde_json::to_writer(&mut *buf, m)?,
            ServerMessage::Observation(m) => serde_json::to_writer(&mut *buf, m)?,
            ServerMessage::Error(m) => serde_json::to_writer(&mut *buf, m)?,
        }
        buf.push(b'\n');
        Ok(())
    }
}

/// Protocol state of one client connection
#[derive(Debug, Clone)]
pub struct Connection {
    session: Session,
    protocol_version: String,
    handshaken: bool,
    last_seq: Option<u64>,
}

impl Connection {
    pub fn new(session: Session, protocol_version: impl Into<String>) -> Self {
        Self {
            session,
            protocol_version: protocol_version.into(),
            handshaken: false,
            last_seq: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_handshaken(&self) -> bool {
        self.handshaken
    }

    /// Handle one inbound line and return the replies, in order
    pub fn handle_line(&mut self, line: &str) -> Vec<ServerMessage> {
        let msg = match parse_message(line) {
            Ok(msg) => msg,
            Err(e) => {
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                debug!(seq, error = %e, "unparseable message");
                return vec![error(seq, ErrorCode::InvalidCommand, &e.to_string())];
            }
        };

        let seq = msg.seq();
        if let Some(prev) = self.last_seq {
            if seq <= prev {
                return vec![error(
                    seq,
                    ErrorCode::OutOfOrder,
                    &format!("seq {seq} is not greater than {prev}"),
                )];
            }
        }
        self.last_seq = Some(seq);

        match msg {
            ParsedMessage::Hello(hello) => self.handle_hello(hello),
            ParsedMessage::Unknown(_) => {
                vec![error(seq, ErrorCode::InvalidCommand, "unknown message type")]
            }
            _ if !self.handshaken => vec![error(
                seq,
                ErrorCode::HandshakeRequired,
                "send hello before any other message",
            )],
            ParsedMessage::Command(cmd) => self.handle_command(cmd),
            ParsedMessage::Observe(observe) => {
                vec![ServerMessage::Observation(build_observation(
                    observe.seq,
                    &self.session,
                ))]
            }
        }
    }

    fn handle_hello(&mut self, hello: HelloMessage) -> Vec<ServerMessage> {
        if !is_compatible_version(&hello.protocol_version, &self.protocol_version) {
            warn!(
                client = %hello.client.name,
                requested = %hello.protocol_version,
                "protocol mismatch"
            );
            return vec![error(
                hello.seq,
                ErrorCode::ProtocolMismatch,
                &format!(
                    "protocol {} is not compatible with {}",
                    hello.protocol_version, self.protocol_version
                ),
            )];
        }

        self.handshaken = true;
        info!(client = %hello.client.name, version = %hello.client.version, "handshake complete");
        vec![ServerMessage::Welcome(create_welcome(
            hello.seq,
            &self.protocol_version,
            self.session.active(),
        ))]
    }

    fn handle_command(&mut self, cmd: CommandMessage) -> Vec<ServerMessage> {
        let outcome = match cmd.command {
            WireCommand::SwitchVariant { variant } => {
                self.session.set_active(variant.into());
                Outcome::Applied
            }
            other => match other.game_command() {
                Some(command) => self.session.apply(command),
                None => Outcome::Applied,
            },
        };
        debug!(seq = cmd.seq, command = ?cmd.command, outcome = outcome.as_str(), "command handled");

        vec![
            ServerMessage::Ack(create_ack(cmd.seq, outcome)),
            ServerMessage::Observation(build_observation(cmd.seq, &self.session)),
        ]
    }
}

fn error(seq: u64, code: ErrorCode, message: &str) -> ServerMessage {
    ServerMessage::Error(create_error(seq, code, message))
}

/// Start the TCP server
///
/// Runs until the listener fails. When `ready_tx` is given, the bound address
/// is sent on it once the server accepts connections (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    catalog: Arc<LevelCatalog>,
    engine: EngineConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let bound = listener.local_addr()?;
    info!(%bound, protocol = %config.protocol_version, "puzzle server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0u64;
    loop {
        let (socket, peer) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %peer, "client connected");

        let connection = Connection::new(
            Session::new(Arc::clone(&catalog), engine),
            config.protocol_version.clone(),
        );
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, connection).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Drive a single client connection until EOF
async fn handle_client(socket: TcpStream, mut connection: Connection) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut buf = Vec::with_capacity(4096);

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        buf.clear();
        for reply in connection.handle_line(line) {
            reply.write_line(&mut buf)?;
        }
        writer.write_all(&buf).await?;
        writer.flush().await?;
    }
    Ok(())
}
