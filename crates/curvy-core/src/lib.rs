//! Core abstractions for the Curvytron client game session.
//!
//! This crate provides the fundamental building blocks:
//! - `Inbound` / `Outbound` - Typed remote notifications
//! - `Session` / `Avatar` - Shared game model
//! - `ReadinessGate` - Two-signal "ready" aggregation
//! - `SubscriptionRegistry` - Symmetric attach/detach bookkeeping
//! - `TickQueue` - Work deferred to the next scheduling tick
//! - `GamepadPool` - Reference-counted gamepad polling
//! - Collaborator traits (transport, loader, render, navigation, audio)

pub mod config;
pub mod game;
pub mod gamepad;
pub mod gate;
pub mod protocol;
pub mod registry;
pub mod tick;
pub mod traits;

pub use config::ControllerConfig;
pub use game::{Avatar, Input, InputOrigin, Room, Session, SessionHandle};
pub use gamepad::GamepadPool;
pub use gate::ReadinessGate;
pub use protocol::{AvatarId, EventKind, Inbound, MoveEvent, Outbound};
pub use registry::{SubscriptionRegistry, Topic};
pub use tick::TickQueue;
pub use traits::{Host, NavigationHook, Refresh, Subscriber};
