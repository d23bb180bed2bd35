//! Recording collaborators for tests.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use curvy_core::{
    AvatarId, EventKind, GamepadPool, Host, NavigationHook, Outbound, Subscriber,
    traits::{
        AssetLoader, Audio, Chat, GamepadPoller, InputEvents, NavigationHost, Radio,
        RemoteChannel, RenderSurface,
    },
};

/// One collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send(Outbound),
    Subscribe(Subscriber, EventKind),
    Unsubscribe(Subscriber, EventKind),
    OnLoad,
    OffLoad,
    Mount(String),
    SetBorderless(bool),
    Refresh,
    Navigate(String),
    Confirm(String),
    Hook(NavigationHook),
    Unhook(NavigationHook),
    SetBeforeUnload,
    ClearBeforeUnload,
    OnMove(AvatarId),
    OffMove(AvatarId),
    GamepadStart,
    GamepadStop,
    AudioStop(String),
    AudioToggle,
    RadioActive(bool),
    RadioToggle,
    ChatClear,
}

/// Collaborator that records every call in order.
pub struct Recorder {
    calls: RefCell<Vec<Call>>,
    path: RefCell<String>,
    confirm_answer: Cell<bool>,
}

impl Recorder {
    /// Recorder whose location is `path` and whose user grants confirmations.
    #[must_use]
    pub fn new(path: &str) -> Rc<Self> {
        Rc::new(Self {
            calls: RefCell::new(Vec::new()),
            path: RefCell::new(path.to_string()),
            confirm_answer: Cell::new(true),
        })
    }

    /// Host whose collaborators all record into `this`.
    #[must_use]
    pub fn host(this: &Rc<Self>) -> Host {
        Host {
            remote: this.clone(),
            loader: this.clone(),
            render: this.clone(),
            navigation: this.clone(),
            input: this.clone(),
            gamepad: Rc::new(GamepadPool::new(this.clone())),
            audio: this.clone(),
            radio: this.clone(),
            chat: this.clone(),
        }
    }

    /// Answer given to the next confirmation prompts.
    pub fn answer_confirm(&self, granted: bool) {
        self.confirm_answer.set(granted);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    /// Index of the first occurrence of `call`.
    #[must_use]
    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == call)
    }

    /// Outbound notifications sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Outbound> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Send(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl RemoteChannel for Recorder {
    fn send(&self, msg: Outbound) {
        self.record(Call::Send(msg));
    }

    fn subscribe(&self, subscriber: Subscriber, kind: EventKind) {
        self.record(Call::Subscribe(subscriber, kind));
    }

    fn unsubscribe(&self, subscriber: Subscriber, kind: EventKind) {
        self.record(Call::Unsubscribe(subscriber, kind));
    }
}

impl AssetLoader for Recorder {
    fn on_load(&self) {
        self.record(Call::OnLoad);
    }

    fn off_load(&self) {
        self.record(Call::OffLoad);
    }
}

impl RenderSurface for Recorder {
    fn mount(&self, element_id: &str) {
        self.record(Call::Mount(element_id.to_string()));
    }

    fn set_borderless(&self, borderless: bool) {
        self.record(Call::SetBorderless(borderless));
    }

    fn refresh(&self) {
        self.record(Call::Refresh);
    }
}

impl NavigationHost for Recorder {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn navigate(&self, path: &str) {
        self.record(Call::Navigate(path.to_string()));
        *self.path.borrow_mut() = path.to_string();
    }

    fn confirm(&self, message: &str) -> bool {
        self.record(Call::Confirm(message.to_string()));
        self.confirm_answer.get()
    }

    fn hook(&self, hook: NavigationHook) {
        self.record(Call::Hook(hook));
    }

    fn unhook(&self, hook: NavigationHook) {
        self.record(Call::Unhook(hook));
    }

    fn set_before_unload(&self) {
        self.record(Call::SetBeforeUnload);
    }

    fn clear_before_unload(&self) {
        self.record(Call::ClearBeforeUnload);
    }
}

impl InputEvents for Recorder {
    fn on_move(&self, avatar: AvatarId) {
        self.record(Call::OnMove(avatar));
    }

    fn off_move(&self, avatar: AvatarId) {
        self.record(Call::OffMove(avatar));
    }
}

impl GamepadPoller for Recorder {
    fn start(&self) {
        self.record(Call::GamepadStart);
    }

    fn stop(&self) {
        self.record(Call::GamepadStop);
    }
}

impl Audio for Recorder {
    fn stop(&self, cue: &str) {
        self.record(Call::AudioStop(cue.to_string()));
    }

    fn toggle(&self) {
        self.record(Call::AudioToggle);
    }
}

impl Radio for Recorder {
    fn set_active(&self, active: bool) {
        self.record(Call::RadioActive(active));
    }

    fn toggle(&self) {
        self.record(Call::RadioToggle);
    }
}

impl Chat for Recorder {
    fn clear(&self) {
        self.record(Call::ChatClear);
    }
}
