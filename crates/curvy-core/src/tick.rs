//! Work deferred to the next scheduling tick.

use std::collections::VecDeque;

/// FIFO of actions to run once the current turn has finished.
///
/// Handlers push here instead of mutating state that is still being
/// dispatched; the event loop drains the queue between notifications.
#[derive(Debug, Clone)]
pub struct TickQueue<T> {
    pending: VecDeque<T>,
}

impl<T> Default for TickQueue<T> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<T> TickQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&mut self, action: T) {
        self.pending.push_back(action);
    }

    /// Take everything queued so far. Actions deferred while the returned
    /// batch runs land in the next tick.
    pub fn take(&mut self) -> Vec<T> {
        self.pending.drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
