//! Readiness aggregation.

/// Gate over the two completion signals a session waits for.
///
/// The gate answers "fire now" exactly once: on the call where both the
/// asset load and the session setup are complete for the first time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessGate {
    assets_loaded: bool,
    setup_complete: bool,
    signaled: bool,
}

impl ReadinessGate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assets_loaded: false,
            setup_complete: false,
            signaled: false,
        }
    }

    /// Record that assets are loaded; returns true if ready must be sent now.
    #[must_use]
    pub const fn mark_assets_loaded(&mut self) -> bool {
        self.assets_loaded = true;
        self.check_ready()
    }

    /// Record that setup is complete; returns true if ready must be sent now.
    #[must_use]
    pub const fn mark_setup_complete(&mut self) -> bool {
        self.setup_complete = true;
        self.check_ready()
    }

    /// Returns true once, the first time both signals are set.
    #[must_use]
    pub const fn check_ready(&mut self) -> bool {
        if self.signaled || !(self.assets_loaded && self.setup_complete) {
            return false;
        }
        self.signaled = true;
        true
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.signaled
    }

    #[must_use]
    pub const fn assets_loaded(&self) -> bool {
        self.assets_loaded
    }

    #[must_use]
    pub const fn setup_complete(&self) -> bool {
        self.setup_complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_second_signal_in_either_order() {
        let mut gate = ReadinessGate::new();
        assert!(!gate.mark_assets_loaded());
        assert!(gate.mark_setup_complete());

        let mut gate = ReadinessGate::new();
        assert!(!gate.mark_setup_complete());
        assert!(gate.mark_assets_loaded());
        assert!(gate.is_ready());
    }

    #[test]
    fn test_never_fires_twice() {
        let mut gate = ReadinessGate::new();
        let _ = gate.mark_setup_complete();
        assert!(gate.mark_assets_loaded());

        assert!(!gate.check_ready());
        assert!(!gate.mark_assets_loaded());
        assert!(!gate.mark_setup_complete());
        assert!(!gate.check_ready());
    }

    #[test]
    fn test_repeated_single_signal_does_not_fire() {
        let mut gate = ReadinessGate::new();
        for _ in 0..3 {
            assert!(!gate.mark_assets_loaded());
        }
        assert!(gate.assets_loaded());
        assert!(!gate.setup_complete());
        assert!(!gate.is_ready());
    }
}
