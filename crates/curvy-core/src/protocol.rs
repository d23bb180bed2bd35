//! Typed notifications exchanged with the remote authority.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Avatar identifier as assigned by the server.
pub type AvatarId = u32;

/// Inbound notification kinds a component can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "borderless")]
    Borderless,
    #[serde(rename = "spectate")]
    Spectate,
    #[serde(rename = "round:new")]
    RoundNew,
    #[serde(rename = "score")]
    Score,
    #[serde(rename = "score:round")]
    RoundScore,
    #[serde(rename = "game:leave")]
    GameLeave,
}

impl EventKind {
    /// Wire name of this notification.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Borderless => "borderless",
            Self::Spectate => "spectate",
            Self::RoundNew => "round:new",
            Self::Score => "score",
            Self::RoundScore => "score:round",
            Self::GameLeave => "game:leave",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Notification from the remote authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Inbound {
    /// The game's borderless mode changed.
    #[serde(rename = "borderless")]
    Borderless { borderless: bool },
    /// This client became a spectator.
    #[serde(rename = "spectate")]
    Spectate,
    /// A new round started.
    #[serde(rename = "round:new")]
    RoundNew,
    /// An avatar's total score changed.
    #[serde(rename = "score")]
    Score { avatar: AvatarId, score: u32 },
    /// An avatar's round score changed.
    #[serde(rename = "score:round")]
    RoundScore { avatar: AvatarId, score: u32 },
    /// An avatar left the game.
    #[serde(rename = "game:leave")]
    GameLeave { avatar: AvatarId },
}

impl Inbound {
    /// Subscription key for this notification.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Borderless { .. } => EventKind::Borderless,
            Self::Spectate => EventKind::Spectate,
            Self::RoundNew => EventKind::RoundNew,
            Self::Score { .. } => EventKind::Score,
            Self::RoundScore { .. } => EventKind::RoundScore,
            Self::GameLeave { .. } => EventKind::GameLeave,
        }
    }
}

/// Notification sent to the remote authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Outbound {
    /// Assets are loaded and the session is set up.
    #[serde(rename = "ready")]
    Ready,
    /// A local avatar changed direction.
    #[serde(rename = "player:move")]
    PlayerMove {
        avatar: AvatarId,
        #[serde(rename = "move")]
        direction: i8,
    },
    /// This client leaves the room hosting the game.
    #[serde(rename = "room:leave")]
    RoomLeave,
}

/// Move event produced by a local input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvent {
    pub avatar: AvatarId,
    /// `None` when the device released every direction key.
    pub direction: Option<i8>,
}

impl MoveEvent {
    #[must_use]
    pub const fn new(avatar: AvatarId, direction: Option<i8>) -> Self {
        Self { avatar, direction }
    }

    /// Outbound form; a missing direction is sent as neutral.
    #[must_use]
    pub fn to_outbound(self) -> Outbound {
        Outbound::PlayerMove {
            avatar: self.avatar,
            direction: self.direction.unwrap_or(0),
        }
    }
}
