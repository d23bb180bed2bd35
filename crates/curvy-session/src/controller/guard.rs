//! Exit and navigation guard.
//!
//! Every way out of the game view goes through [`GameController::on_unload`].
//! One confirmation policy applies to all of them, and cleanup runs in a
//! fixed order once leaving is allowed.

use curvy_core::{NavigationHook, Outbound, Topic};

use super::{GameController, Phase};

/// How the game view is being left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Teardown {
    /// The browser window or tab is closing.
    BeforeUnload,
    /// In-app navigation to `to`.
    Navigate { to: String },
    /// The game view is destroyed; nothing can be cancelled anymore.
    Destroy,
}

/// Result of a teardown attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Cleanup ran; the host may continue.
    Proceed,
    /// The host must show this message through its native prompt.
    Prompt(String),
    /// The user declined; the navigation must not happen.
    Cancel,
}

/// Confirmation is needed only for players of a running game.
#[must_use]
pub const fn needs_confirmation(spectating: bool, started: bool) -> bool {
    !spectating && started
}

impl GameController {
    /// Whether leaving now needs the user's confirmation.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        let started = self
            .session
            .as_ref()
            .is_some_and(|session| session.borrow().started);
        needs_confirmation(self.spectating, started)
    }

    /// Apply the confirmation policy to a teardown attempt, then clean up.
    pub fn on_unload(&mut self, teardown: Teardown) -> Decision {
        if self.phase == Phase::Closed {
            return Decision::Proceed;
        }

        if self.needs_confirmation() {
            match &teardown {
                Teardown::BeforeUnload => {
                    return Decision::Prompt(self.config.confirmation.clone());
                }
                Teardown::Navigate { to } => {
                    if !self.host.navigation.confirm(&self.config.confirmation) {
                        tracing::info!(to = %to, "Leaving the game was declined");
                        return Decision::Cancel;
                    }
                }
                Teardown::Destroy => {}
            }
        }

        let location = match teardown {
            Teardown::Navigate { to } => to,
            Teardown::BeforeUnload | Teardown::Destroy => self.host.navigation.current_path(),
        };
        self.exit(&location);
        Decision::Proceed
    }

    /// Go back to the room of the current game.
    pub fn back_to_room(&mut self) -> Decision {
        let Some(url) = self.room.as_ref().map(|room| room.url.clone()) else {
            return Decision::Proceed;
        };

        let decision = self.on_unload(Teardown::Navigate { to: url.clone() });
        if decision == Decision::Proceed {
            self.host.navigation.navigate(&url);
        }
        decision
    }

    /// Unconditional cleanup, `location` being where the client ends up.
    ///
    /// The room leave goes out before any subscription is detached.
    fn exit(&mut self, location: &str) {
        self.phase = Phase::Exiting;

        let started = self
            .session
            .as_ref()
            .is_some_and(|session| session.borrow().started);
        let elsewhere = self.room.as_ref().is_some_and(|room| room.url != location);

        if elsewhere || started {
            tracing::info!(%location, started, "Leaving room");
            self.host.remote.send(Outbound::RoomLeave);
            self.host.chat.clear();
        }

        if self.before_unload {
            self.host.navigation.clear_before_unload();
            self.before_unload = false;
        }

        self.host.audio.stop(&self.config.victory_cue);

        self.detach(Topic::Navigation(NavigationHook::RouteChangeStart));
        self.detach(Topic::Navigation(NavigationHook::Destroy));

        self.close();
        self.phase = Phase::Closed;
        tracing::info!("Game closed");
    }
}
