//! Last-in-first-out record of reversible user actions.

use crate::domain::error::{DomainError, DomainResult};

/// Actions a user can take that `undo` knows how to reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddPoint,
}

/// Stack of performed actions, most recent on top.
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, action: Action) {
        self.entries.push(action);
    }

    /// Removes and returns the most recent action.
    ///
    /// Callers that want the reset fallback check [`ActionLog::len`] first.
    pub fn pop(&mut self) -> DomainResult<Action> {
        self.entries.pop().ok_or(DomainError::EmptyHistory)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view, oldest first.
    pub fn entries(&self) -> &[Action] {
        &self.entries
    }
}
