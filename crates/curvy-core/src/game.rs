//! Game session model shared by the controllers.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AvatarId, config::DEFAULT_ROOM_PATH_PREFIX};

/// Session identifier, unique per game instance on this client.
pub type SessionId = Uuid;

/// Shared handle to the live session.
///
/// The client runs on a single event thread; handlers borrow the session
/// for the duration of their body only.
pub type SessionHandle = Rc<RefCell<Session>>;

/// Room hosting a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    /// In-app location of the room view.
    pub url: String,
}

impl Room {
    /// Create a room using the default room path prefix.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_prefix(name, DEFAULT_ROOM_PATH_PREFIX)
    }

    /// Create a room whose url is `prefix` followed by the encoded name.
    #[must_use]
    pub fn with_prefix(name: impl Into<String>, prefix: &str) -> Self {
        let name = name.into();
        let url = room_path(prefix, &name);
        Self { name, url }
    }
}

/// In-app path of the room called `name`.
#[must_use]
pub fn room_path(prefix: &str, name: &str) -> String {
    format!("{prefix}{}", urlencoding::encode(name))
}

/// Device driving a local avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputOrigin {
    Keyboard,
    Gamepad { index: usize },
}

/// Input capability owned by a local avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub origin: InputOrigin,
}

impl Input {
    #[must_use]
    pub const fn keyboard() -> Self {
        Self {
            origin: InputOrigin::Keyboard,
        }
    }

    #[must_use]
    pub const fn gamepad(index: usize) -> Self {
        Self {
            origin: InputOrigin::Gamepad { index },
        }
    }

    /// Whether this input needs the gamepad poller running.
    #[must_use]
    pub const fn uses_gamepad(&self) -> bool {
        matches!(self.origin, InputOrigin::Gamepad { .. })
    }
}

/// Game participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub id: AvatarId,
    pub name: String,
    pub score: u32,
    pub round_score: u32,
    /// True when the avatar is driven from this client.
    pub local: bool,
    /// Present for local avatars only.
    pub input: Option<Input>,
}

impl Avatar {
    /// Avatar driven by another client.
    #[must_use]
    pub fn remote(id: AvatarId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            round_score: 0,
            local: false,
            input: None,
        }
    }

    /// Avatar driven from this client by `input`.
    #[must_use]
    pub fn local(id: AvatarId, name: impl Into<String>, input: Input) -> Self {
        Self {
            local: true,
            input: Some(input),
            ..Self::remote(id, name)
        }
    }

    pub const fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub const fn set_round_score(&mut self, score: u32) {
        self.round_score = score;
    }
}

/// One game instance as handed over by the session repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub room: Room,
    pub avatars: Vec<Avatar>,
    pub started: bool,
    pub borderless: bool,
}

impl Session {
    /// Create a session hosted by `room`, named after it.
    #[must_use]
    pub fn new(room: Room) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: room.name.clone(),
            room,
            avatars: Vec::new(),
            started: false,
            borderless: false,
        }
    }

    /// Add a participant.
    #[must_use]
    pub fn with_avatar(mut self, avatar: Avatar) -> Self {
        self.avatars.push(avatar);
        self
    }

    /// Mark the game as started.
    #[must_use]
    pub fn started(mut self) -> Self {
        self.started = true;
        self
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn into_handle(self) -> SessionHandle {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn avatar(&self, id: AvatarId) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.id == id)
    }

    pub fn avatar_mut(&mut self, id: AvatarId) -> Option<&mut Avatar> {
        self.avatars.iter_mut().find(|a| a.id == id)
    }

    /// Local avatars, in reverse insertion order.
    pub fn local_avatars(&self) -> impl Iterator<Item = &Avatar> {
        self.avatars.iter().rev().filter(|a| a.local)
    }

    /// Rank avatars by score, highest first. Ties keep their order.
    pub fn sort_avatars(&mut self) {
        self.avatars.sort_by(|a, b| b.score.cmp(&a.score));
    }
}
