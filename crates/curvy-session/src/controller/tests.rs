use std::rc::Rc;

use curvy_core::{
    Avatar, ControllerConfig, EventKind, Inbound, Input, MoveEvent, NavigationHook, Outbound,
    Refresh, Room, Session, SessionHandle, Subscriber,
};

use super::*;
use crate::{
    MemoryRepository,
    testing::{Call, Recorder},
};

const GAME_PATH: &str = "/game/alpha";

fn session(started: bool) -> SessionHandle {
    let mut session = Session::new(Room::new("alpha"))
        .with_avatar(Avatar::local(1, "keys", Input::keyboard()))
        .with_avatar(Avatar::local(2, "pad", Input::gamepad(0)))
        .with_avatar(Avatar::remote(3, "other"));
    session.started = started;
    session.into_handle()
}

fn entered(started: bool) -> (Rc<Recorder>, GameController) {
    let recorder = Recorder::new(GAME_PATH);
    let mut controller = GameController::new(Recorder::host(&recorder), ControllerConfig::default());
    controller.enter(session(started));
    (recorder, controller)
}

#[test]
fn test_enter_attaches_everything() {
    let (recorder, controller) = entered(false);

    assert_eq!(controller.phase(), Phase::Active);
    for kind in [EventKind::Borderless, EventKind::Spectate, EventKind::RoundNew] {
        assert_eq!(recorder.count(&Call::Subscribe(Subscriber::Game, kind)), 1);
    }
    assert_eq!(recorder.count(&Call::OnMove(1)), 1);
    assert_eq!(recorder.count(&Call::OnMove(2)), 1);
    assert_eq!(recorder.count(&Call::OnMove(3)), 0);
    assert_eq!(recorder.count(&Call::Hook(NavigationHook::RouteChangeStart)), 1);
    assert_eq!(recorder.count(&Call::Hook(NavigationHook::Destroy)), 1);
    assert_eq!(recorder.count(&Call::SetBeforeUnload), 1);
    assert_eq!(recorder.count(&Call::Mount("render".to_string())), 1);
    assert_eq!(recorder.count(&Call::RadioActive(true)), 1);
    assert_eq!(recorder.count(&Call::OnLoad), 1);
}

#[test]
fn test_ready_waits_for_assets_and_fires_once() {
    let (recorder, mut controller) = entered(false);
    assert!(recorder.sent().is_empty());
    assert!(!controller.is_ready());

    controller.on_assets_loaded();
    assert_eq!(recorder.sent(), vec![Outbound::Ready]);
    assert_eq!(recorder.count(&Call::OffLoad), 1);

    controller.on_assets_loaded();
    assert_eq!(recorder.count(&Call::Send(Outbound::Ready)), 1);
    assert_eq!(recorder.count(&Call::OffLoad), 1);
    assert!(controller.is_ready());
}

#[test]
fn test_enter_twice_is_ignored() {
    let (recorder, mut controller) = entered(false);
    recorder.clear();

    controller.enter(session(false));
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_move_is_forwarded_with_neutral_default() {
    let (recorder, controller) = entered(false);

    controller.on_move(MoveEvent::new(1, Some(-1)));
    controller.on_move(MoveEvent::new(2, None));
    controller.on_move(MoveEvent::new(3, Some(1)));

    assert_eq!(
        recorder.sent(),
        vec![
            Outbound::PlayerMove {
                avatar: 1,
                direction: -1
            },
            Outbound::PlayerMove {
                avatar: 2,
                direction: 0
            },
        ]
    );
}

#[test]
fn test_borderless_is_projected_not_toggled() {
    let (recorder, mut controller) = entered(false);

    let refresh = controller.dispatch(&Inbound::Borderless { borderless: true });
    assert_eq!(refresh, Refresh::Clean);
    let _ = controller.dispatch(&Inbound::Borderless { borderless: true });

    assert_eq!(recorder.count(&Call::SetBorderless(true)), 2);
    assert_eq!(recorder.count(&Call::SetBorderless(false)), 0);
    assert!(controller.session().unwrap().borrow().borderless);
}

#[test]
fn test_spectate_latches_and_refreshes() {
    let (_recorder, mut controller) = entered(true);
    assert!(controller.needs_confirmation());

    assert_eq!(controller.dispatch(&Inbound::Spectate), Refresh::Dirty);
    assert!(controller.is_spectating());
    assert!(!controller.needs_confirmation());
}

#[test]
fn test_first_round_fires_once_and_unsubscribes_next_tick() {
    let (recorder, mut controller) = entered(false);
    let unsubscribe = Call::Unsubscribe(Subscriber::Game, EventKind::RoundNew);

    assert_eq!(controller.dispatch(&Inbound::RoundNew), Refresh::Dirty);
    assert_eq!(recorder.count(&unsubscribe), 0);
    assert!(controller.subscriptions().contains(&Topic::Remote(EventKind::RoundNew)));

    assert_eq!(controller.dispatch(&Inbound::RoundNew), Refresh::Clean);

    controller.end_tick();
    assert_eq!(recorder.count(&unsubscribe), 1);

    for _ in 0..5 {
        assert_eq!(controller.dispatch(&Inbound::RoundNew), Refresh::Clean);
        controller.end_tick();
    }
    assert_eq!(recorder.count(&unsubscribe), 1);
}

#[test]
fn test_score_notifications_are_not_for_the_controller() {
    let (_recorder, mut controller) = entered(false);
    let refresh = controller.dispatch(&Inbound::Score { avatar: 1, score: 3 });
    assert_eq!(refresh, Refresh::Clean);
    assert_eq!(controller.session().unwrap().borrow().avatars[0].score, 0);
}

#[test]
fn test_confirmation_table() {
    assert!(needs_confirmation(false, true));
    assert!(!needs_confirmation(true, true));
    assert!(!needs_confirmation(false, false));
    assert!(!needs_confirmation(true, false));

    let (_recorder, controller) = entered(false);
    assert!(!controller.needs_confirmation());
}

#[test]
fn test_before_unload_prompts_without_side_effects() {
    let (recorder, mut controller) = entered(true);
    recorder.clear();

    let decision = controller.on_unload(Teardown::BeforeUnload);
    assert_eq!(
        decision,
        Decision::Prompt("Are you sure you want to leave the game?".to_string())
    );
    assert!(recorder.calls().is_empty());
    assert_eq!(controller.phase(), Phase::Active);
}

#[test]
fn test_declined_navigation_has_no_side_effects() {
    let (recorder, mut controller) = entered(true);
    recorder.answer_confirm(false);
    recorder.clear();

    let decision = controller.on_unload(Teardown::Navigate {
        to: "/".to_string(),
    });

    assert_eq!(decision, Decision::Cancel);
    assert_eq!(
        recorder.calls(),
        vec![Call::Confirm(
            "Are you sure you want to leave the game?".to_string()
        )]
    );
    assert_eq!(controller.phase(), Phase::Active);
    assert!(!controller.subscriptions().is_empty());
}

#[test]
fn test_leave_is_sent_before_detach() {
    let (recorder, mut controller) = entered(true);

    let decision = controller.on_unload(Teardown::Navigate {
        to: "/".to_string(),
    });
    assert_eq!(decision, Decision::Proceed);

    let leave = recorder.position(&Call::Send(Outbound::RoomLeave)).unwrap();
    let first_detach = recorder
        .calls()
        .iter()
        .position(|c| matches!(c, Call::Unsubscribe(..) | Call::Unhook(_) | Call::OffMove(_)))
        .unwrap();
    assert!(leave < first_detach);
    assert_eq!(recorder.count(&Call::ChatClear), 1);
    assert_eq!(recorder.count(&Call::ClearBeforeUnload), 1);
    assert_eq!(recorder.count(&Call::AudioStop("win".to_string())), 1);
    assert_eq!(controller.phase(), Phase::Closed);
    assert!(controller.session().is_none());
}

#[test]
fn test_exit_detaches_every_subscription() {
    let (recorder, mut controller) = entered(false);
    controller.on_unload(Teardown::Destroy);

    let calls = recorder.calls();
    for call in &calls {
        let undo = match call {
            Call::Subscribe(s, k) => Call::Unsubscribe(*s, *k),
            Call::Hook(h) => Call::Unhook(*h),
            Call::OnMove(a) => Call::OffMove(*a),
            Call::OnLoad => Call::OffLoad,
            Call::GamepadStart => Call::GamepadStop,
            _ => continue,
        };
        assert_eq!(recorder.count(&undo), 1, "missing or repeated {undo:?}");
    }
    assert!(controller.subscriptions().is_empty());
}

#[test]
fn test_back_to_room_before_start_keeps_room() {
    let (recorder, mut controller) = entered(false);

    assert_eq!(controller.back_to_room(), Decision::Proceed);
    assert_eq!(recorder.count(&Call::Send(Outbound::RoomLeave)), 0);
    assert_eq!(recorder.count(&Call::ChatClear), 0);
    assert_eq!(recorder.count(&Call::Navigate("/room/alpha".to_string())), 1);
    assert_eq!(controller.phase(), Phase::Closed);
}

#[test]
fn test_before_unload_without_confirmation_cleans_up() {
    let (recorder, mut controller) = entered(false);

    assert_eq!(controller.on_unload(Teardown::BeforeUnload), Decision::Proceed);
    assert_eq!(recorder.count(&Call::Send(Outbound::RoomLeave)), 1);
    assert_eq!(controller.phase(), Phase::Closed);
}

#[test]
fn test_exit_is_idempotent() {
    let (recorder, mut controller) = entered(true);

    assert_eq!(controller.on_unload(Teardown::Destroy), Decision::Proceed);
    assert_eq!(controller.on_unload(Teardown::Destroy), Decision::Proceed);
    assert_eq!(controller.back_to_room(), Decision::Proceed);

    assert_eq!(recorder.count(&Call::Send(Outbound::RoomLeave)), 1);
    assert_eq!(recorder.count(&Call::AudioStop("win".to_string())), 1);
}

#[test]
fn test_destroy_before_enter_is_safe() {
    let recorder = Recorder::new(GAME_PATH);
    let mut controller = GameController::new(Recorder::host(&recorder), ControllerConfig::default());

    controller.close();
    assert_eq!(controller.on_unload(Teardown::Destroy), Decision::Proceed);

    assert_eq!(recorder.count(&Call::Send(Outbound::RoomLeave)), 0);
    assert!(
        !recorder
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Unhook(_) | Call::Unsubscribe(..)))
    );
}

#[test]
fn test_gamepad_polling_is_shared() {
    let recorder = Recorder::new(GAME_PATH);
    let mut controller = GameController::new(Recorder::host(&recorder), ControllerConfig::default());
    let game = Session::new(Room::new("alpha"))
        .with_avatar(Avatar::local(1, "pad-a", Input::gamepad(0)))
        .with_avatar(Avatar::local(2, "pad-b", Input::gamepad(1)));
    controller.enter(game.into_handle());
    assert_eq!(recorder.count(&Call::GamepadStart), 1);

    assert_eq!(controller.on_unload(Teardown::Destroy), Decision::Proceed);
    assert_eq!(recorder.count(&Call::GamepadStop), 1);
    assert_eq!(recorder.count(&Call::OffMove(1)), 1);
    assert_eq!(recorder.count(&Call::OffMove(2)), 1);
}

#[test]
fn test_shared_avatar_id_holds_gamepad_once() {
    let recorder = Recorder::new(GAME_PATH);
    let mut controller = GameController::new(Recorder::host(&recorder), ControllerConfig::default());
    let game = Session::new(Room::new("alpha"))
        .with_avatar(Avatar::local(7, "pad-a", Input::gamepad(0)))
        .with_avatar(Avatar::local(7, "pad-b", Input::gamepad(1)));
    controller.enter(game.into_handle());
    assert_eq!(recorder.count(&Call::OnMove(7)), 1);
    assert_eq!(recorder.count(&Call::GamepadStart), 1);

    assert_eq!(controller.on_unload(Teardown::Destroy), Decision::Proceed);
    assert_eq!(controller.phase(), Phase::Closed);
    assert_eq!(recorder.count(&Call::OffMove(7)), 1);
    assert_eq!(recorder.count(&Call::GamepadStop), 1);
}

#[test]
fn test_open_redirects_without_matching_game() {
    let recorder = Recorder::new(GAME_PATH);
    let mut controller = GameController::new(Recorder::host(&recorder), ControllerConfig::default());
    let repository = MemoryRepository::with_game(Session::new(Room::new("beta")));

    let entry = controller.open(&repository, "my game");
    assert_eq!(entry, Entry::Redirected("/room/my%20game".to_string()));
    assert!(repository.is_started());
    assert_eq!(controller.phase(), Phase::Entering);
    assert_eq!(recorder.count(&Call::Navigate("/room/my%20game".to_string())), 1);
}

#[test]
fn test_open_enters_matching_game() {
    let recorder = Recorder::new(GAME_PATH);
    let mut controller = GameController::new(Recorder::host(&recorder), ControllerConfig::default());
    let repository = MemoryRepository::new();
    repository.hold(session(false));

    assert_eq!(controller.open(&repository, "alpha"), Entry::Loaded);
    assert_eq!(controller.phase(), Phase::Active);
    assert_eq!(controller.room().unwrap().url, "/room/alpha");
}

#[test]
fn test_open_on_used_controller_is_reported() {
    let (recorder, mut controller) = entered(false);
    let repository = MemoryRepository::new();
    repository.hold(session(false));
    recorder.clear();

    assert_eq!(controller.open(&repository, "alpha"), Entry::AlreadyEntered);
    assert_eq!(controller.open(&repository, "beta"), Entry::AlreadyEntered);
    assert!(!repository.is_started());
    assert!(recorder.calls().is_empty());
    assert_eq!(controller.phase(), Phase::Active);
}

#[test]
fn test_toggles_are_forwarded() {
    let (recorder, controller) = entered(false);
    controller.toggle_sound();
    controller.toggle_radio();
    assert_eq!(recorder.count(&Call::AudioToggle), 1);
    assert_eq!(recorder.count(&Call::RadioToggle), 1);
}
