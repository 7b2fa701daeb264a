//! Protocol module - JSON message types for remote puzzle clients
//!
//! Line-delimited JSON: one object per line. Every message has `type` and
//! `seq`; server messages also carry `ts` (milliseconds since the epoch).
//!
//! Client -> server: `hello`, `command`, `observe`.
//! Server -> client: `welcome`, `ack`, `observation`, `error`.

use serde::{Deserialize, Serialize};

use crate::core::{Block, Piece, Session, TargetDescriptor};
use crate::types::{
    BlockId, Direction, GameCommand, IgnoreReason, Outcome, RejectReason, ShapeKind, ShapeSize,
    Variant,
};

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommandType {
    #[default]
    #[serde(rename = "command")]
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObserveType {
    #[default]
    #[serde(rename = "observe")]
    Observe,
}

/// Client hello message (first message on every connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Command message; `command.name` selects the operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub command: WireCommand,
}

/// Request for a fresh observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserveMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ObserveType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum WireCommand {
    RotateLeft,
    RotateRight,
    Expand,
    Duplicate,
    CheckMatch,
    Select { block_id: u32 },
    Move { direction: DirectionLower },
    Restart,
    SwitchVariant { variant: VariantLower },
}

impl WireCommand {
    /// The session command this maps to; `None` for `switchVariant`,
    /// which changes the active variant rather than an engine.
    pub fn game_command(&self) -> Option<GameCommand> {
        Some(match *self {
            WireCommand::RotateLeft => GameCommand::RotateLeft,
            WireCommand::RotateRight => GameCommand::RotateRight,
            WireCommand::Expand => GameCommand::Expand,
            WireCommand::Duplicate => GameCommand::Duplicate,
            WireCommand::CheckMatch => GameCommand::CheckMatch,
            WireCommand::Select { block_id } => GameCommand::Select(BlockId(block_id)),
            WireCommand::Move { direction } => GameCommand::Move(direction.into()),
            WireCommand::Restart => GameCommand::Restart,
            WireCommand::SwitchVariant { .. } => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionLower {
    Left,
    Right,
    Up,
    Down,
}

impl From<DirectionLower> for Direction {
    fn from(d: DirectionLower) -> Self {
        match d {
            DirectionLower::Left => Direction::Left,
            DirectionLower::Right => Direction::Right,
            DirectionLower::Up => Direction::Up,
            DirectionLower::Down => Direction::Down,
        }
    }
}

impl From<Direction> for DirectionLower {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Left => DirectionLower::Left,
            Direction::Right => DirectionLower::Right,
            Direction::Up => DirectionLower::Up,
            Direction::Down => DirectionLower::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantLower {
    Shape,
    Slide,
}

impl From<VariantLower> for Variant {
    fn from(v: VariantLower) -> Self {
        match v {
            VariantLower::Shape => Variant::Shape,
            VariantLower::Slide => Variant::Slide,
        }
    }
}

impl From<Variant> for VariantLower {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Shape => VariantLower::Shape,
            Variant::Slide => VariantLower::Slide,
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    InvalidCommand,
    ProtocolMismatch,
    OutOfOrder,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub variants: [VariantLower; 2],
    pub active_variant: VariantLower,
}

/// Acknowledgment of one command, echoing its `seq`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub outcome: OutcomeView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeStatus {
    Applied,
    LevelComplete,
    Rejected,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeReason {
    Blocked,
    InvalidSelection,
    NoMatch,
    NoMovesLeft,
    NoSelection,
    AtBoundary,
    AtCeiling,
    NothingToDuplicate,
}

/// Wire form of [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeView {
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<OutcomeReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<u32>,
}

impl From<Outcome> for OutcomeView {
    fn from(outcome: Outcome) -> Self {
        let mut view = OutcomeView {
            status: OutcomeStatus::Applied,
            reason: None,
            level: None,
            blocked_by: None,
            block_id: None,
        };
        match outcome {
            Outcome::Applied => {}
            Outcome::LevelComplete { level } => {
                view.status = OutcomeStatus::LevelComplete;
                view.level = Some(level);
            }
            Outcome::Rejected(reason) => {
                view.status = OutcomeStatus::Rejected;
                view.reason = Some(match reason {
                    RejectReason::Blocked { by } => {
                        view.blocked_by = Some(by.0);
                        OutcomeReason::Blocked
                    }
                    RejectReason::InvalidSelection(id) => {
                        view.block_id = Some(id.0);
                        OutcomeReason::InvalidSelection
                    }
                    RejectReason::NoMatch => OutcomeReason::NoMatch,
                });
            }
            Outcome::Ignored(reason) => {
                view.status = OutcomeStatus::Ignored;
                view.reason = Some(match reason {
                    IgnoreReason::NoMovesLeft => OutcomeReason::NoMovesLeft,
                    IgnoreReason::NoSelection => OutcomeReason::NoSelection,
                    IgnoreReason::AtBoundary => OutcomeReason::AtBoundary,
                    IgnoreReason::AtCeiling => OutcomeReason::AtCeiling,
                    IgnoreReason::NothingToDuplicate => OutcomeReason::NothingToDuplicate,
                });
            }
        }
        view
    }
}

/// Error message; `seq` echoes the offending message when it could be read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Full state of both variants of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub variant: VariantLower,
    pub shape: ShapeSnapshot,
    pub slide: SlideSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub level: u32,
    pub moves_left: u32,
    pub pieces: Vec<PieceSnapshot>,
    pub target: TargetSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub id: u64,
    pub kind: ShapeKindLower,
    pub size: ShapeSizeLower,
    pub rotation: i64,
}

impl From<&Piece> for PieceSnapshot {
    fn from(p: &Piece) -> Self {
        Self {
            id: p.id.0,
            kind: p.kind.into(),
            size: p.size.into(),
            rotation: p.rotation_degrees,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub kind: ShapeKindLower,
    pub size: ShapeSizeLower,
    pub rotation: i64,
}

impl From<&TargetDescriptor> for TargetSnapshot {
    fn from(t: &TargetDescriptor) -> Self {
        Self {
            kind: t.kind.into(),
            size: t.size.into(),
            rotation: t.rotation_degrees,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSnapshot {
    pub level: u32,
    pub grid_size: i32,
    pub moves_left: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<u32>,
    pub blocks: Vec<BlockSnapshot>,
    /// Directions the selected block can move right now
    pub movable: Vec<DirectionLower>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub is_target: bool,
}

impl From<&Block> for BlockSnapshot {
    fn from(b: &Block) -> Self {
        Self {
            id: b.id.0,
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            is_target: b.is_target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKindLower {
    Triangle,
    Square,
    Circle,
}

impl From<ShapeKind> for ShapeKindLower {
    fn from(k: ShapeKind) -> Self {
        match k {
            ShapeKind::Triangle => ShapeKindLower::Triangle,
            ShapeKind::Square => ShapeKindLower::Square,
            ShapeKind::Circle => ShapeKindLower::Circle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeSizeLower {
    Small,
    Medium,
    Large,
}

impl From<ShapeSize> for ShapeSizeLower {
    fn from(s: ShapeSize) -> Self {
        match s {
            ShapeSize::Small => ShapeSizeLower::Small,
            ShapeSize::Medium => ShapeSizeLower::Medium,
            ShapeSize::Large => ShapeSizeLower::Large,
        }
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
///
/// A well-formed object with an unknown `type` is reported as
/// [`ParsedMessage::Unknown`] rather than as a parse error.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "observe")]
        Observe(ObserveMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type.as_deref() {
                Some("hello" | "command" | "observe") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: envelope.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Observe(ObserveMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Command(m) => m.seq,
            ParsedMessage::Observe(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Pull `seq` out of a line that failed to parse, for error correlation.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    rest[..end].parse().ok()
}

/// Whether a client's requested version shares the server's major version
pub fn is_compatible_version(requested: &str, server: &str) -> bool {
    let major = |v: &str| v.trim().split('.').next().map(str::to_owned);
    match (major(requested), major(server)) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
    }
}

/// Create a command message
pub fn create_command(seq: u64, command: WireCommand) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        command,
    }
}

/// Create a welcome message
pub fn create_welcome(seq: u64, protocol_version: &str, active: Variant) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        variants: [VariantLower::Shape, VariantLower::Slide],
        active_variant: active.into(),
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64, outcome: Outcome) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        outcome: outcome.into(),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Snapshot both engines of `session`
pub fn build_observation(seq: u64, session: &Session) -> ObservationMessage {
    let shape = session.shape().state();
    let slide = session.slide();
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        variant: session.active().into(),
        shape: ShapeSnapshot {
            level: shape.level,
            moves_left: shape.moves_left,
            pieces: shape.pieces.iter().map(PieceSnapshot::from).collect(),
            target: TargetSnapshot::from(&shape.target),
        },
        slide: SlideSnapshot {
            level: slide.level(),
            grid_size: slide.grid_size(),
            moves_left: slide.moves_left(),
            selection: slide.selection().map(|id| id.0),
            blocks: slide.blocks().iter().map(BlockSnapshot::from).collect(),
            movable: slide
                .movable_directions()
                .into_iter()
                .map(DirectionLower::from)
                .collect(),
        },
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
