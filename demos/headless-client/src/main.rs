//! Headless client running a scripted game session.
//!
//! Run with: cargo run -p headless-client [frames.jsonl]
//!
//! Each line of the optional file is one server frame. Set `CURVY_CONFIG`
//! to a JSON file to override the controller configuration.

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context;
use curvy_core::{
    Avatar, AvatarId, ControllerConfig, GamepadPool, Host, Input, MoveEvent, NavigationHook,
    Outbound, Room, Session,
    traits::{
        AssetLoader, Audio, Chat, GamepadPoller, InputEvents, NavigationHost, Radio, RenderSurface,
    },
};
use curvy_session::{Entry, GameController, MemoryRepository, ScoreBoard, Teardown};
use curvy_transport::{ChannelTransport, ClientEvent, EventLoop, decode_frame, encode};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const GAME: &str = "demo room";

const SCRIPT: &[&str] = &[
    r#"{"event":"borderless","borderless":true}"#,
    r#"[{"event":"round:new"},{"event":"score:round","avatar":2,"score":1}]"#,
    r#"{"event":"score","avatar":2,"score":1}"#,
    r#"{"event":"score","avatar":1,"score":3}"#,
    r#"{"event":"round:new"}"#,
    r#"{"event":"spectate"}"#,
];

/// Collaborators that only log what they are asked to do.
struct ConsoleHost {
    path: RefCell<String>,
}

impl AssetLoader for ConsoleHost {
    fn on_load(&self) {
        tracing::debug!("loader: listening for load");
    }

    fn off_load(&self) {
        tracing::debug!("loader: stopped listening");
    }
}

impl RenderSurface for ConsoleHost {
    fn mount(&self, element_id: &str) {
        tracing::info!(element_id, "render: mounted");
    }

    fn set_borderless(&self, borderless: bool) {
        tracing::info!(borderless, "render: presentation updated");
    }

    fn refresh(&self) {
        tracing::info!("render: refresh");
    }
}

impl NavigationHost for ConsoleHost {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn navigate(&self, path: &str) {
        tracing::info!(path, "navigation: navigate");
        *self.path.borrow_mut() = path.to_string();
    }

    fn confirm(&self, message: &str) -> bool {
        tracing::info!(message, "navigation: confirm (granted)");
        true
    }

    fn hook(&self, hook: NavigationHook) {
        tracing::debug!(?hook, "navigation: hooked");
    }

    fn unhook(&self, hook: NavigationHook) {
        tracing::debug!(?hook, "navigation: unhooked");
    }

    fn set_before_unload(&self) {
        tracing::debug!("navigation: before unload set");
    }

    fn clear_before_unload(&self) {
        tracing::debug!("navigation: before unload cleared");
    }
}

impl InputEvents for ConsoleHost {
    fn on_move(&self, avatar: AvatarId) {
        tracing::debug!(avatar, "input: listening");
    }

    fn off_move(&self, avatar: AvatarId) {
        tracing::debug!(avatar, "input: stopped listening");
    }
}

impl GamepadPoller for ConsoleHost {
    fn start(&self) {
        tracing::info!("gamepad: polling started");
    }

    fn stop(&self) {
        tracing::info!("gamepad: polling stopped");
    }
}

impl Audio for ConsoleHost {
    fn stop(&self, cue: &str) {
        tracing::debug!(cue, "audio: stop");
    }

    fn toggle(&self) {
        tracing::info!("audio: toggled");
    }
}

impl Radio for ConsoleHost {
    fn set_active(&self, active: bool) {
        tracing::debug!(active, "radio: active");
    }

    fn toggle(&self) {
        tracing::info!("radio: toggled");
    }
}

impl Chat for ConsoleHost {
    fn clear(&self) {
        tracing::info!("chat: cleared");
    }
}

fn load_config() -> anyhow::Result<ControllerConfig> {
    match std::env::var_os("CURVY_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            ControllerConfig::load(&path)
                .with_context(|| format!("loading config from {}", path.display()))
        }
        None => Ok(ControllerConfig::default()),
    }
}

fn load_frames() -> anyhow::Result<Vec<String>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading frames from {path}"))?;
            Ok(raw
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect())
        }
        None => Ok(SCRIPT.iter().map(|s| (*s).to_string()).collect()),
    }
}

async fn forward_outbound(mut rx: mpsc::UnboundedReceiver<Outbound>) {
    while let Some(msg) = rx.recv().await {
        match encode(&msg) {
            Ok(frame) => tracing::info!(%frame, "socket: send"),
            Err(e) => tracing::error!("Failed to encode outbound notification: {e}"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = load_config()?;
    let frames = load_frames()?;

    let console = Rc::new(ConsoleHost {
        path: RefCell::new("/game/demo%20room".to_string()),
    });
    let (transport, outbound_rx) = ChannelTransport::new();
    let forwarder = tokio::spawn(forward_outbound(outbound_rx));

    let host = Host {
        remote: transport.clone(),
        loader: console.clone(),
        render: console.clone(),
        navigation: console.clone(),
        input: console.clone(),
        gamepad: Rc::new(GamepadPool::new(console.clone())),
        audio: console.clone(),
        radio: console.clone(),
        chat: console.clone(),
    };

    let room = Room::with_prefix(GAME, &config.room_path_prefix);
    let repository = MemoryRepository::with_game(
        Session::new(room)
            .with_avatar(Avatar::local(1, "you", Input::keyboard()))
            .with_avatar(Avatar::local(2, "friend", Input::gamepad(0)))
            .with_avatar(Avatar::remote(3, "stranger"))
            .started(),
    );

    let mut controller = GameController::new(host, config);
    if let Entry::Redirected(path) = controller.open(&repository, GAME) {
        anyhow::bail!("no game held for {GAME}, redirected to {path}");
    }
    let scoreboard = ScoreBoard::from_repository(transport.clone(), &repository);

    let mut events = vec![ClientEvent::AssetsLoaded];
    for frame in &frames {
        let batch = decode_frame(frame).with_context(|| format!("decoding frame {frame}"))?;
        events.extend(batch.into_iter().map(ClientEvent::Remote));
    }
    events.push(ClientEvent::Move(MoveEvent::new(1, Some(1))));
    events.push(ClientEvent::Move(MoveEvent::new(1, None)));
    events.push(ClientEvent::Unload(Teardown::BeforeUnload));

    let (tx, rx) = mpsc::unbounded_channel();
    for event in events {
        tx.send(event)?;
    }
    drop(tx);

    let mut event_loop = EventLoop::new(Rc::clone(&transport), console, controller, Some(scoreboard));
    let mut source = tokio_stream::wrappers::UnboundedReceiverStream::new(rx);
    let summary = event_loop.run(&mut source).await;

    if let Some(board) = event_loop.scoreboard() {
        for (rank, (avatar, score)) in board.ranking().iter().enumerate() {
            tracing::info!(rank = rank + 1, avatar, score, "final ranking");
        }
    }
    tracing::info!(
        turns = summary.turns,
        refreshes = summary.refreshes,
        phase = ?event_loop.controller().phase(),
        "Session finished"
    );

    drop(event_loop);
    drop(transport);
    forwarder.await?;
    Ok(())
}
