//! Transport layer for the Curvytron client session.
//!
//! Provides:
//! - Wire codec (JSON frames, single or batched)
//! - `ChannelTransport` - `RemoteChannel` over tokio channels
//! - `EventLoop` - Cooperative single-threaded dispatch loop

pub mod channel;
pub mod driver;
pub mod protocol;

pub use channel::{ChannelTransport, SendError};
pub use driver::{ClientEvent, EventLoop, EventSource, LoopSummary};
pub use protocol::{ProtocolError, decode_frame, encode, encode_batch};
