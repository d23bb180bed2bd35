//! Game session controller.
//!
//! Drives one game from entry to exit:
//! - gates the outbound `ready` behind asset load and session setup;
//! - forwards local move input to the remote authority;
//! - reacts to remote `borderless`, `spectate` and `round:new`;
//! - tears everything down through the exit guard (see [`guard`]).

mod guard;

use std::{fmt, rc::Rc};

use curvy_core::{
    AvatarId, ControllerConfig, EventKind, Host, Inbound, MoveEvent, NavigationHook, Outbound,
    ReadinessGate, Refresh, Room, SessionHandle, Subscriber, SubscriptionRegistry, TickQueue, Topic,
    game::room_path, traits::SessionRepository,
};

pub use guard::{Decision, Teardown, needs_confirmation};

/// Lifecycle phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, no subscription attached yet.
    Entering,
    /// Subscriptions attached; the game is playing.
    Active,
    /// Cleanup in progress.
    Exiting,
    /// Session released. Terminal.
    Closed,
}

/// Outcome of opening a game by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// The held game matched and the session was entered.
    Loaded,
    /// The controller already entered a game; nothing was done.
    AlreadyEntered,
    /// No matching game; the client was sent to this room path instead.
    Redirected(String),
}

/// Work run on the tick after the current notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    DropFirstRound,
}

/// Controller for a single game session.
pub struct GameController {
    host: Host,
    config: ControllerConfig,
    phase: Phase,
    session: Option<SessionHandle>,
    room: Option<Room>,
    gate: ReadinessGate,
    subscriptions: SubscriptionRegistry<Topic>,
    gamepad_holders: Vec<AvatarId>,
    before_unload: bool,
    spectating: bool,
    first_round_seen: bool,
    ticks: TickQueue<Deferred>,
}

impl fmt::Debug for GameController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameController")
            .field("phase", &self.phase)
            .field("room", &self.room)
            .field("gate", &self.gate)
            .field("subscriptions", &self.subscriptions)
            .field("spectating", &self.spectating)
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Create a controller in the `Entering` phase.
    #[must_use]
    pub fn new(host: Host, config: ControllerConfig) -> Self {
        Self {
            host,
            config,
            phase: Phase::Entering,
            session: None,
            room: None,
            gate: ReadinessGate::new(),
            subscriptions: SubscriptionRegistry::new(),
            gamepad_holders: Vec::new(),
            before_unload: false,
            spectating: false,
            first_round_seen: false,
            ticks: TickQueue::new(),
        }
    }

    /// Enter the game called `name` if the repository holds it.
    ///
    /// Otherwise navigate to that game's room and report the redirect.
    /// A controller past `Entering` touches neither the repository nor the
    /// router.
    pub fn open(&mut self, repository: &dyn SessionRepository, name: &str) -> Entry {
        if self.phase != Phase::Entering {
            tracing::warn!(phase = ?self.phase, game = %name, "Ignoring open on a used controller");
            return Entry::AlreadyEntered;
        }
        repository.start();

        let game = repository
            .game()
            .filter(|game| game.borrow().name == name);

        if let Some(game) = game {
            self.enter(game);
            Entry::Loaded
        } else {
            let path = room_path(&self.config.room_path_prefix, name);
            tracing::info!(game = %name, %path, "No matching game held, back to room");
            self.host.navigation.navigate(&path);
            Entry::Redirected(path)
        }
    }

    /// Attach everything the session needs and mark setup complete.
    ///
    /// Only valid in the `Entering` phase; later calls are ignored.
    pub fn enter(&mut self, session: SessionHandle) {
        if self.phase != Phase::Entering {
            tracing::warn!(phase = ?self.phase, "Ignoring enter on a used controller");
            return;
        }

        let (id, room, locals) = {
            let game = session.borrow();
            let locals: Vec<(AvatarId, bool)> = game
                .local_avatars()
                .map(|a| (a.id, a.input.is_some_and(|i| i.uses_gamepad())))
                .collect();
            (game.id, game.room.clone(), locals)
        };
        tracing::info!(session = %id, room = %room.name, "Entering game");

        self.attach(Topic::Navigation(NavigationHook::RouteChangeStart));
        self.attach(Topic::Navigation(NavigationHook::Destroy));
        self.host.navigation.set_before_unload();
        self.before_unload = true;

        self.session = Some(session);
        self.room = Some(room);

        self.host.render.mount(&self.config.render_element);
        self.attach(Topic::AssetsLoad);

        for (avatar, uses_gamepad) in locals {
            if self.attach(Topic::InputMove(avatar)) && uses_gamepad {
                self.host.gamepad.acquire();
                self.gamepad_holders.push(avatar);
            }
        }

        self.host.radio.set_active(true);

        self.attach(Topic::Remote(EventKind::Borderless));
        self.attach(Topic::Remote(EventKind::Spectate));
        self.attach(Topic::Remote(EventKind::RoundNew));

        self.phase = Phase::Active;
        if self.gate.mark_setup_complete() {
            self.signal_ready();
        }
    }

    /// Asset loader reported completion.
    pub fn on_assets_loaded(&mut self) {
        if self.session.is_none() {
            return;
        }
        self.detach(Topic::AssetsLoad);
        if self.gate.mark_assets_loaded() {
            self.signal_ready();
        }
    }

    /// Forward a local move to the remote authority.
    pub fn on_move(&self, event: MoveEvent) {
        if !self.subscriptions.contains(&Topic::InputMove(event.avatar)) {
            tracing::debug!(avatar = event.avatar, "Move from a detached input");
            return;
        }
        self.host.remote.send(event.to_outbound());
    }

    /// Route a remote notification to its handler, if subscribed.
    pub fn dispatch(&mut self, msg: &Inbound) -> Refresh {
        if !self.subscriptions.contains(&Topic::Remote(msg.kind())) {
            return Refresh::Clean;
        }

        match msg {
            Inbound::Borderless { borderless } => self.on_borderless(*borderless),
            Inbound::Spectate => self.on_spectate(),
            Inbound::RoundNew => self.on_first_round(),
            Inbound::Score { .. } | Inbound::RoundScore { .. } | Inbound::GameLeave { .. } => {
                Refresh::Clean
            }
        }
    }

    /// Run the work deferred by the previous notifications.
    pub fn end_tick(&mut self) {
        for action in self.ticks.take() {
            match action {
                Deferred::DropFirstRound => {
                    self.detach(Topic::Remote(EventKind::RoundNew));
                }
            }
        }
    }

    pub fn toggle_sound(&self) {
        self.host.audio.toggle();
    }

    pub fn toggle_radio(&self) {
        self.host.radio.toggle();
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_spectating(&self) -> bool {
        self.spectating
    }

    /// Whether `ready` has been sent.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    #[must_use]
    pub fn session(&self) -> Option<SessionHandle> {
        self.session.as_ref().map(Rc::clone)
    }

    #[must_use]
    pub const fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    /// Live subscriptions of this controller.
    #[must_use]
    pub const fn subscriptions(&self) -> &SubscriptionRegistry<Topic> {
        &self.subscriptions
    }

    fn on_borderless(&self, borderless: bool) -> Refresh {
        if let Some(session) = &self.session {
            session.borrow_mut().borderless = borderless;
            let projected = session.borrow().borderless;
            self.host.render.set_borderless(projected);
        }
        Refresh::Clean
    }

    fn on_spectate(&mut self) -> Refresh {
        if !self.spectating {
            tracing::info!("Now spectating");
        }
        self.spectating = true;
        Refresh::Dirty
    }

    fn on_first_round(&mut self) -> Refresh {
        if self.first_round_seen {
            return Refresh::Clean;
        }
        self.first_round_seen = true;
        self.ticks.defer(Deferred::DropFirstRound);
        Refresh::Dirty
    }

    fn signal_ready(&self) {
        tracing::info!("Game ready");
        self.host.remote.send(Outbound::Ready);
    }

    /// Record `topic` and subscribe to it once. Returns false if it was
    /// already attached.
    fn attach(&mut self, topic: Topic) -> bool {
        if !self.subscriptions.attach(topic) {
            return false;
        }
        match topic {
            Topic::Remote(kind) => self.host.remote.subscribe(Subscriber::Game, kind),
            Topic::AssetsLoad => self.host.loader.on_load(),
            Topic::InputMove(avatar) => self.host.input.on_move(avatar),
            Topic::Navigation(hook) => self.host.navigation.hook(hook),
        }
        true
    }

    /// Unsubscribe from `topic` if it is attached.
    fn detach(&mut self, topic: Topic) {
        if !self.subscriptions.detach(&topic) {
            return;
        }
        match topic {
            Topic::Remote(kind) => self.host.remote.unsubscribe(Subscriber::Game, kind),
            Topic::AssetsLoad => self.host.loader.off_load(),
            Topic::InputMove(avatar) => {
                self.host.input.off_move(avatar);
                if let Some(index) = self.gamepad_holders.iter().position(|a| *a == avatar) {
                    self.gamepad_holders.remove(index);
                    self.host.gamepad.release();
                }
            }
            Topic::Navigation(hook) => self.host.navigation.unhook(hook),
        }
    }

    /// Detach remote events and local inputs, then release the session.
    ///
    /// Safe to call when no session is held. Only the exit guard calls this.
    fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        tracing::debug!(session = %session.borrow().id, "Closing game");

        let remote: Vec<Topic> = self
            .subscriptions
            .iter()
            .copied()
            .filter(|t| matches!(t, Topic::Remote(_) | Topic::AssetsLoad))
            .collect();
        for topic in remote {
            self.detach(topic);
        }

        let inputs: Vec<Topic> = self
            .subscriptions
            .iter()
            .copied()
            .filter(|t| matches!(t, Topic::InputMove(_)))
            .collect();
        for topic in inputs {
            self.detach(topic);
        }
    }
}

#[cfg(test)]
mod tests;
