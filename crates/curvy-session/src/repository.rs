//! In-memory session repository.

use std::cell::{Cell, RefCell};

use curvy_core::{Session, SessionHandle, traits::SessionRepository};

/// In-memory repository holding the game of the current room.
///
/// Useful for tests and headless clients; the room layer hands games over
/// with [`MemoryRepository::hold`].
#[derive(Default)]
pub struct MemoryRepository {
    game: RefCell<Option<SessionHandle>>,
    started: Cell<bool>,
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository already holding `session`.
    #[must_use]
    pub fn with_game(session: Session) -> Self {
        let repository = Self::new();
        repository.hold(session.into_handle());
        repository
    }

    /// Hand a game over to the repository.
    pub fn hold(&self, game: SessionHandle) {
        *self.game.borrow_mut() = Some(game);
    }

    /// Forget the held game.
    pub fn release(&self) -> Option<SessionHandle> {
        self.game.borrow_mut().take()
    }

    /// Whether `start` has been called.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.get()
    }
}

impl SessionRepository for MemoryRepository {
    fn start(&self) {
        self.started.set(true);
    }

    fn game(&self) -> Option<SessionHandle> {
        self.game.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use curvy_core::Room;

    use super::*;

    #[test]
    fn test_hold_and_release() {
        let repository = MemoryRepository::new();
        assert!(repository.game().is_none());

        let handle = Session::new(Room::new("alpha")).into_handle();
        repository.hold(Rc::clone(&handle));
        let held = repository.game().unwrap();
        assert!(Rc::ptr_eq(&held, &handle));

        assert!(repository.release().is_some());
        assert!(repository.game().is_none());
    }

    #[test]
    fn test_start_is_recorded() {
        let repository = MemoryRepository::with_game(Session::new(Room::new("alpha")));
        assert!(!repository.is_started());
        repository.start();
        assert!(repository.is_started());
        assert_eq!(repository.game().unwrap().borrow().name, "alpha");
    }
}
