//! Observer seam between the conversation engine and the pipeline

use super::outcome::HookOutcome;
use crate::transcript::Turn;

/// Receives every turn after it is committed to the conversation history
///
/// Called synchronously, one turn at a time; the next turn is not produced
/// until this returns.
#[cfg_attr(test, mockall::automock)]
pub trait TurnObserver {
    fn on_turn(&mut self, turn: &Turn) -> HookOutcome;
}

/// Engine-side conversation history with registered observers
///
/// The engine calls [`TurnRelay::commit`] for each message it appends.
#[derive(Default)]
pub struct TurnRelay<'a> {
    history: Vec<Turn>,
    observers: Vec<&'a mut dyn TurnObserver>,
}

impl<'a> TurnRelay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; observers run in registration order
    pub fn register(&mut self, observer: &'a mut dyn TurnObserver) {
        self.observers.push(observer);
    }

    /// Append a turn to the history, then notify every observer
    ///
    /// Returns true if any observer asked for the session to stop. Every
    /// observer is notified regardless.
    pub fn commit(&mut self, turn: Turn) -> bool {
        self.history.push(turn);
        let turn = &self.history[self.history.len() - 1];

        let mut halt_requested = false;
        for observer in self.observers.iter_mut() {
            halt_requested |= observer.on_turn(turn).halt_requested;
        }
        halt_requested
    }

    /// Turns committed so far
    pub fn history(&self) -> &[Turn] {
        &self.history
    }
}
