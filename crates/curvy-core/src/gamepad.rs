//! Reference-counted access to the gamepad poller.

use std::{cell::Cell, rc::Rc};

use crate::traits::GamepadPoller;

/// Shares the process-wide gamepad poller between local avatars.
///
/// The poller starts when the first holder acquires it and stops when the
/// last holder releases it.
pub struct GamepadPool {
    poller: Rc<dyn GamepadPoller>,
    holders: Cell<usize>,
}

impl GamepadPool {
    #[must_use]
    pub fn new(poller: Rc<dyn GamepadPoller>) -> Self {
        Self {
            poller,
            holders: Cell::new(0),
        }
    }

    /// Take a hold on the poller, starting it if nobody held it.
    pub fn acquire(&self) {
        let holders = self.holders.get();
        if holders == 0 {
            tracing::debug!("Starting gamepad polling");
            self.poller.start();
        }
        self.holders.set(holders + 1);
    }

    /// Drop a hold; stops the poller when it was the last one.
    ///
    /// Releasing with no holder is ignored.
    pub fn release(&self) {
        match self.holders.get() {
            0 => {}
            1 => {
                self.holders.set(0);
                tracing::debug!("Stopping gamepad polling");
                self.poller.stop();
            }
            n => self.holders.set(n - 1),
        }
    }

    #[must_use]
    pub fn holders(&self) -> usize {
        self.holders.get()
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.holders.get() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingPoller {
        starts: Cell<usize>,
        stops: Cell<usize>,
    }

    impl GamepadPoller for CountingPoller {
        fn start(&self) {
            self.starts.set(self.starts.get() + 1);
        }

        fn stop(&self) {
            self.stops.set(self.stops.get() + 1);
        }
    }

    #[test]
    fn test_starts_once_stops_at_zero() {
        let poller = Rc::new(CountingPoller::default());
        let pool = GamepadPool::new(poller.clone());

        pool.acquire();
        pool.acquire();
        assert_eq!(poller.starts.get(), 1);
        assert_eq!(pool.holders(), 2);

        pool.release();
        assert_eq!(poller.stops.get(), 0);
        assert!(pool.is_polling());

        pool.release();
        assert_eq!(poller.stops.get(), 1);
        assert!(!pool.is_polling());
    }

    #[test]
    fn test_release_without_acquire() {
        let poller = Rc::new(CountingPoller::default());
        let pool = GamepadPool::new(poller.clone());
        pool.release();
        assert_eq!(poller.stops.get(), 0);
        assert_eq!(pool.holders(), 0);
    }
}
