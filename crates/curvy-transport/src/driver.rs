//! Cooperative event loop for one game session.
//!
//! Each event is one turn: it is delivered to the subscribed components,
//! then deferred work runs, then the view is refreshed at most once.

use std::rc::Rc;

use async_trait::async_trait;
use curvy_core::{Inbound, MoveEvent, Refresh, Subscriber, traits::RenderSurface};
use curvy_session::{Decision, GameController, Phase, ScoreBoard, Teardown};
use futures::{Stream, StreamExt};

use crate::ChannelTransport;

/// Everything that can wake the client up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Notification from the server.
    Remote(Inbound),
    /// The asset loader finished.
    AssetsLoaded,
    /// A local input device moved.
    Move(MoveEvent),
    /// The view is being left through `Teardown`.
    Unload(Teardown),
    /// The user asked to go back to the room.
    BackToRoom,
}

/// Source of client events.
#[async_trait(?Send)]
pub trait EventSource {
    /// Next event, or `None` once the source is exhausted.
    async fn next_event(&mut self) -> Option<ClientEvent>;
}

#[async_trait(?Send)]
impl<S> EventSource for S
where
    S: Stream<Item = ClientEvent> + Unpin,
{
    async fn next_event(&mut self) -> Option<ClientEvent> {
        self.next().await
    }
}

/// What a run of the loop did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub turns: usize,
    pub refreshes: usize,
}

/// Event loop tying the controller and score board to a transport.
pub struct EventLoop {
    transport: Rc<ChannelTransport>,
    render: Rc<dyn RenderSurface>,
    controller: GameController,
    scoreboard: Option<ScoreBoard>,
}

impl EventLoop {
    #[must_use]
    pub fn new(
        transport: Rc<ChannelTransport>,
        render: Rc<dyn RenderSurface>,
        controller: GameController,
        scoreboard: Option<ScoreBoard>,
    ) -> Self {
        Self {
            transport,
            render,
            controller,
            scoreboard,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &GameController {
        &self.controller
    }

    #[must_use]
    pub const fn scoreboard(&self) -> Option<&ScoreBoard> {
        self.scoreboard.as_ref()
    }

    /// Process events until the game is closed or the source runs dry.
    pub async fn run<E>(&mut self, source: &mut E) -> LoopSummary
    where
        E: EventSource + ?Sized,
    {
        let mut summary = LoopSummary::default();

        while let Some(event) = source.next_event().await {
            summary.turns += 1;
            if self.turn(event).is_dirty() {
                summary.refreshes += 1;
                self.render.refresh();
            }

            if self.controller.phase() == Phase::Closed {
                break;
            }
        }

        if self.controller.phase() == Phase::Closed {
            if let Some(board) = self.scoreboard.as_mut() {
                board.detach();
            }
        }

        tracing::debug!(
            turns = summary.turns,
            refreshes = summary.refreshes,
            "Event loop finished"
        );
        summary
    }

    /// Handle one event, then run the work it deferred.
    pub fn turn(&mut self, event: ClientEvent) -> Refresh {
        let refresh = match event {
            ClientEvent::Remote(msg) => self.deliver(&msg),
            ClientEvent::AssetsLoaded => {
                self.controller.on_assets_loaded();
                Refresh::Clean
            }
            ClientEvent::Move(event) => {
                self.controller.on_move(event);
                Refresh::Clean
            }
            ClientEvent::Unload(teardown) => {
                let decision = self.controller.on_unload(teardown);
                log_decision(&decision);
                Refresh::Clean
            }
            ClientEvent::BackToRoom => {
                let decision = self.controller.back_to_room();
                log_decision(&decision);
                Refresh::Clean
            }
        };

        self.controller.end_tick();
        refresh
    }

    fn deliver(&mut self, msg: &Inbound) -> Refresh {
        let kind = msg.kind();
        let mut refresh = Refresh::Clean;

        if self.transport.is_subscribed(Subscriber::Game, kind) {
            refresh = refresh.merge(self.controller.dispatch(msg));
        }
        if let Some(board) = self.scoreboard.as_mut() {
            if self.transport.is_subscribed(Subscriber::PlayerList, kind) {
                refresh = refresh.merge(board.dispatch(msg));
            }
        }
        refresh
    }
}

fn log_decision(decision: &Decision) {
    match decision {
        Decision::Proceed => tracing::debug!("Leaving the game"),
        Decision::Prompt(message) => tracing::info!(%message, "Native leave prompt requested"),
        Decision::Cancel => tracing::info!("Navigation cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use curvy_core::{Avatar, ControllerConfig, EventKind, Host, Input, Outbound, Room, Session};
    use curvy_session::testing::{Call, Recorder};
    use tokio::sync::mpsc;

    use super::*;

    struct Fixture {
        recorder: Rc<Recorder>,
        transport: Rc<ChannelTransport>,
        outbound: mpsc::UnboundedReceiver<Outbound>,
        event_loop: EventLoop,
    }

    fn fixture(started: bool) -> Fixture {
        let recorder = Recorder::new("/game/alpha");
        let (transport, outbound) = ChannelTransport::new();
        let host = Host {
            remote: transport.clone(),
            ..Recorder::host(&recorder)
        };

        let mut game = Session::new(Room::new("alpha"))
            .with_avatar(Avatar::local(1, "me", Input::keyboard()))
            .with_avatar(Avatar::remote(2, "them"));
        game.started = started;
        let game = game.into_handle();

        let mut controller = GameController::new(host, ControllerConfig::default());
        controller.enter(Rc::clone(&game));
        let scoreboard = ScoreBoard::attach(transport.clone(), Some(game));

        let event_loop = EventLoop::new(
            Rc::clone(&transport),
            recorder.clone(),
            controller,
            Some(scoreboard),
        );
        Fixture {
            recorder,
            transport,
            outbound,
            event_loop,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> Vec<Outbound> {
        let mut sent = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            sent.push(msg);
        }
        sent
    }

    #[tokio::test]
    async fn test_full_session() {
        let mut fx = fixture(true);
        let mut events = futures::stream::iter(vec![
            ClientEvent::AssetsLoaded,
            ClientEvent::Remote(Inbound::RoundNew),
            ClientEvent::Remote(Inbound::Score { avatar: 2, score: 3 }),
            ClientEvent::Move(MoveEvent::new(1, None)),
            ClientEvent::Remote(Inbound::RoundNew),
            ClientEvent::Unload(Teardown::Destroy),
            ClientEvent::Remote(Inbound::Spectate),
        ]);

        let summary = fx.event_loop.run(&mut events).await;

        assert_eq!(summary.turns, 6);
        assert_eq!(summary.refreshes, 3);
        assert_eq!(fx.recorder.count(&Call::Refresh), 3);
        assert_eq!(
            drain(&mut fx.outbound),
            vec![
                Outbound::Ready,
                Outbound::PlayerMove {
                    avatar: 1,
                    direction: 0
                },
                Outbound::RoomLeave,
            ]
        );
        assert_eq!(fx.transport.subscription_count(), 0);
        assert!(!fx.event_loop.scoreboard().unwrap().is_attached());
        assert_eq!(fx.event_loop.scoreboard().unwrap().ranking()[0], (2, 3));
    }

    #[test]
    fn test_first_round_detached_after_turn() {
        let mut fx = fixture(false);

        let refresh = fx.event_loop.turn(ClientEvent::Remote(Inbound::RoundNew));
        assert!(refresh.is_dirty());
        assert!(!fx.transport.is_subscribed(Subscriber::Game, EventKind::RoundNew));
        assert!(
            fx.transport
                .is_subscribed(Subscriber::PlayerList, EventKind::RoundNew)
        );

        assert!(fx.event_loop.turn(ClientEvent::Remote(Inbound::Spectate)).is_dirty());
        assert!(fx.event_loop.controller().is_spectating());
    }

    #[test]
    fn test_declined_navigation_keeps_running() {
        let mut fx = fixture(true);
        fx.recorder.answer_confirm(false);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut events = tokio_stream::wrappers::UnboundedReceiverStream::new(rx);

        tx.send(ClientEvent::BackToRoom).unwrap();
        tx.send(ClientEvent::Remote(Inbound::Borderless { borderless: true }))
            .unwrap();
        drop(tx);

        let summary = tokio_test::block_on(fx.event_loop.run(&mut events));

        assert_eq!(summary.turns, 2);
        assert_eq!(fx.event_loop.controller().phase(), Phase::Active);
        assert_eq!(fx.recorder.count(&Call::SetBorderless(true)), 1);
        assert!(drain(&mut fx.outbound).is_empty());
        assert!(fx.event_loop.scoreboard().unwrap().is_attached());
    }
}
