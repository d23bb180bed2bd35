//! Player list kept in sync with remote score notifications.

use std::rc::Rc;

use curvy_core::{
    Avatar, AvatarId, EventKind, Inbound, Refresh, SessionHandle, Subscriber, SubscriptionRegistry,
    traits::{RemoteChannel, SessionRepository},
};

/// Notifications the score board listens to.
const EVENTS: [EventKind; 4] = [
    EventKind::Score,
    EventKind::RoundScore,
    EventKind::GameLeave,
    EventKind::RoundNew,
];

/// Ranked avatar view of the current game.
///
/// Built over an existing session only; without one it stays inert and
/// never subscribes.
pub struct ScoreBoard {
    remote: Rc<dyn RemoteChannel>,
    session: Option<SessionHandle>,
    subscriptions: SubscriptionRegistry<EventKind>,
}

impl ScoreBoard {
    /// Attach to the score notifications of `session`, if there is one.
    #[must_use]
    pub fn attach(remote: Rc<dyn RemoteChannel>, session: Option<SessionHandle>) -> Self {
        let mut board = Self {
            remote,
            session,
            subscriptions: SubscriptionRegistry::new(),
        };

        if board.session.is_some() {
            for kind in EVENTS {
                if board.subscriptions.attach(kind) {
                    board.remote.subscribe(Subscriber::PlayerList, kind);
                }
            }
        }
        board
    }

    /// Attach to the game currently held by `repository`.
    #[must_use]
    pub fn from_repository(
        remote: Rc<dyn RemoteChannel>,
        repository: &dyn SessionRepository,
    ) -> Self {
        Self::attach(remote, repository.game())
    }

    /// Handle a remote notification.
    pub fn dispatch(&mut self, msg: &Inbound) -> Refresh {
        if !self.subscriptions.contains(&msg.kind()) {
            return Refresh::Clean;
        }

        match *msg {
            Inbound::Score { avatar, score } => self.update(avatar, |a| a.set_score(score)),
            Inbound::RoundScore { avatar, score } => {
                self.update(avatar, |a| a.set_round_score(score))
            }
            Inbound::GameLeave { .. } | Inbound::RoundNew => Refresh::Dirty,
            Inbound::Borderless { .. } | Inbound::Spectate => Refresh::Clean,
        }
    }

    /// Detach all listeners together. Safe to call more than once.
    pub fn detach(&mut self) {
        for kind in self.subscriptions.drain() {
            self.remote.unsubscribe(Subscriber::PlayerList, kind);
        }
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Avatars in display order as `(id, score)`.
    #[must_use]
    pub fn ranking(&self) -> Vec<(AvatarId, u32)> {
        self.session
            .as_ref()
            .map(|session| {
                session
                    .borrow()
                    .avatars
                    .iter()
                    .map(|a| (a.id, a.score))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn update(&self, id: AvatarId, apply: impl FnOnce(&mut Avatar)) -> Refresh {
        let Some(session) = &self.session else {
            return Refresh::Clean;
        };
        let mut game = session.borrow_mut();

        let Some(avatar) = game.avatar_mut(id) else {
            tracing::debug!(avatar = id, "Score for unknown avatar");
            return Refresh::Clean;
        };
        apply(avatar);
        game.sort_avatars();
        Refresh::Dirty
    }
}
