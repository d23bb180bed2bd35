//! Collaborator traits the session core drives.
//!
//! Every call is fire-and-forget: collaborators report completion through
//! notifications, never through return values, except where noted.

use std::rc::Rc;

use crate::{AvatarId, EventKind, GamepadPool, Outbound, SessionHandle};

/// Component owning a remote subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subscriber {
    /// The game session controller.
    Game,
    /// The score board / player list.
    PlayerList,
}

/// Navigation-level hooks that lead into the exit guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationHook {
    /// An in-app route change is about to happen.
    RouteChangeStart,
    /// The game view is being destroyed.
    Destroy,
}

/// Whether a handler changed anything the view displays.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refresh {
    /// Nothing visible changed.
    #[default]
    Clean,
    /// The view needs a redraw.
    Dirty,
}

impl Refresh {
    #[must_use]
    pub const fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty)
    }

    /// Combine two outcomes; dirty wins.
    pub const fn merge(self, other: Self) -> Self {
        if self.is_dirty() || other.is_dirty() {
            Self::Dirty
        } else {
            Self::Clean
        }
    }
}

/// Holder of the game handed over by the room.
pub trait SessionRepository {
    /// Start listening for game updates.
    fn start(&self);

    /// Currently held game, if any.
    fn game(&self) -> Option<SessionHandle>;
}

/// Bidirectional notification channel to the remote authority.
pub trait RemoteChannel {
    /// Send an outbound notification.
    fn send(&self, msg: Outbound);

    /// Start delivering `kind` notifications to `subscriber`.
    fn subscribe(&self, subscriber: Subscriber, kind: EventKind);

    /// Stop delivering `kind` notifications to `subscriber`.
    fn unsubscribe(&self, subscriber: Subscriber, kind: EventKind);
}

/// Asset loader; emits a single `load` notification when done.
pub trait AssetLoader {
    /// Start listening for the `load` notification.
    fn on_load(&self);

    /// Stop listening for the `load` notification.
    fn off_load(&self);
}

/// Surface the game renders into.
pub trait RenderSurface {
    /// Mount the game DOM under the element named `element_id`.
    fn mount(&self, element_id: &str);

    /// Set the borderless presentation state.
    fn set_borderless(&self, borderless: bool);

    /// Redraw the views derived from session state.
    fn refresh(&self);
}

/// In-app router plus the browser's native hooks.
pub trait NavigationHost {
    /// Path of the view currently shown.
    fn current_path(&self) -> String;

    /// Route to `path` inside the app.
    fn navigate(&self, path: &str);

    /// Ask the user to confirm; returns true when granted.
    fn confirm(&self, message: &str) -> bool;

    /// Route `hook` into the exit guard.
    fn hook(&self, hook: NavigationHook);

    /// Remove a hook installed by [`NavigationHost::hook`].
    fn unhook(&self, hook: NavigationHook);

    /// Register the native "before unload" handler.
    fn set_before_unload(&self);

    /// Remove the native "before unload" handler.
    fn clear_before_unload(&self);
}

/// Move events from local input devices.
pub trait InputEvents {
    /// Start delivering move events for `avatar`.
    fn on_move(&self, avatar: AvatarId);

    /// Stop delivering move events for `avatar`.
    fn off_move(&self, avatar: AvatarId);
}

/// Process-wide gamepad polling loop. Both calls are idempotent.
pub trait GamepadPoller {
    /// Start polling connected gamepads.
    fn start(&self);

    /// Stop polling.
    fn stop(&self);
}

/// Sound effects.
pub trait Audio {
    /// Stop the sound named `cue` if it is playing.
    fn stop(&self, cue: &str);

    /// Mute or unmute sound effects.
    fn toggle(&self);
}

/// Background music.
pub trait Radio {
    /// Mark the radio as in use by a game view.
    fn set_active(&self, active: bool);

    /// Mute or unmute the radio.
    fn toggle(&self);
}

/// Room chat.
pub trait Chat {
    /// Drop the chat history of the room.
    fn clear(&self);
}

/// Bundle of collaborators handed to the controllers.
#[derive(Clone)]
pub struct Host {
    pub remote: Rc<dyn RemoteChannel>,
    pub loader: Rc<dyn AssetLoader>,
    pub render: Rc<dyn RenderSurface>,
    pub navigation: Rc<dyn NavigationHost>,
    pub input: Rc<dyn InputEvents>,
    pub gamepad: Rc<GamepadPool>,
    pub audio: Rc<dyn Audio>,
    pub radio: Rc<dyn Radio>,
    pub chat: Rc<dyn Chat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_merge() {
        assert_eq!(Refresh::Clean.merge(Refresh::Clean), Refresh::Clean);
        assert_eq!(Refresh::Clean.merge(Refresh::Dirty), Refresh::Dirty);
        assert!(Refresh::Dirty.merge(Refresh::Clean).is_dirty());
    }
}
