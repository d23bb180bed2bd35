//! `RemoteChannel` implementation over tokio channels.

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use curvy_core::{EventKind, Outbound, Subscriber, traits::RemoteChannel};
use tokio::sync::mpsc;

/// Send error.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Channel closed")]
    ChannelClosed,
}

/// Transport that queues outbound notifications on a channel and keeps the
/// delivery table for inbound ones.
///
/// The socket side drains the receiver returned by [`ChannelTransport::new`];
/// the event loop asks [`ChannelTransport::is_subscribed`] before delivering.
pub struct ChannelTransport {
    outbound: mpsc::UnboundedSender<Outbound>,
    subscriptions: RefCell<HashSet<(Subscriber, EventKind)>>,
}

impl ChannelTransport {
    /// Create a transport and the receiver of its outbound notifications.
    #[must_use]
    pub fn new() -> (Rc<Self>, mpsc::UnboundedReceiver<Outbound>) {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let transport = Rc::new(Self {
            outbound,
            subscriptions: RefCell::new(HashSet::new()),
        });
        (transport, outbound_rx)
    }

    /// Queue an outbound notification.
    ///
    /// # Errors
    /// Returns error if the socket side is gone.
    pub fn try_send(&self, msg: Outbound) -> Result<(), SendError> {
        self.outbound
            .send(msg)
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Whether `subscriber` currently receives `kind`.
    #[must_use]
    pub fn is_subscribed(&self, subscriber: Subscriber, kind: EventKind) -> bool {
        self.subscriptions.borrow().contains(&(subscriber, kind))
    }

    /// Number of live subscriptions across all subscribers.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }
}

impl RemoteChannel for ChannelTransport {
    fn send(&self, msg: Outbound) {
        if let Err(e) = self.try_send(msg) {
            tracing::warn!("Dropping outbound notification: {e}");
        }
    }

    fn subscribe(&self, subscriber: Subscriber, kind: EventKind) {
        if !self.subscriptions.borrow_mut().insert((subscriber, kind)) {
            tracing::warn!(?subscriber, %kind, "Duplicate subscription");
        }
    }

    fn unsubscribe(&self, subscriber: Subscriber, kind: EventKind) {
        if !self.subscriptions.borrow_mut().remove(&(subscriber, kind)) {
            tracing::debug!(?subscriber, %kind, "Unsubscribe without subscription");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_table() {
        let (transport, _rx) = ChannelTransport::new();
        transport.subscribe(Subscriber::Game, EventKind::Spectate);
        transport.subscribe(Subscriber::PlayerList, EventKind::Spectate);

        assert!(transport.is_subscribed(Subscriber::Game, EventKind::Spectate));
        assert!(!transport.is_subscribed(Subscriber::Game, EventKind::Score));
        assert_eq!(transport.subscription_count(), 2);

        transport.unsubscribe(Subscriber::Game, EventKind::Spectate);
        transport.unsubscribe(Subscriber::Game, EventKind::Spectate);
        assert_eq!(transport.subscription_count(), 1);
    }

    #[test]
    fn test_send_after_close() {
        let (transport, mut rx) = ChannelTransport::new();
        transport.send(Outbound::Ready);
        assert_eq!(rx.try_recv().unwrap(), Outbound::Ready);

        drop(rx);
        assert!(matches!(
            transport.try_send(Outbound::RoomLeave),
            Err(SendError::ChannelClosed)
        ));
        transport.send(Outbound::RoomLeave);
    }
}
