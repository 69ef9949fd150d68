//! Input buffer shared between the UI event layer and the tick
//!
//! Key events arrive asynchronously from the browser but only ever mutate
//! this buffer; the tick reads it at well-defined boundaries, so the
//! single-threaded model needs no locking. Held keys are level-triggered;
//! the jump is additionally latched as an explicit one-shot request that a
//! qualifying platform contact consumes exactly once.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical game keys (the UI layer maps physical keys onto these)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
    /// Restart confirmation after game over
    Confirm,
}

/// Currently-held keys plus the pending one-shot jump request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputBuffer {
    held: HashSet<Key>,
    jump_requested: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.held.insert(key);
        if key == Key::Jump {
            self.jump_requested = true;
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    #[inline]
    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// Consume the pending jump: clears both the request and the held jump
    /// key, so one press produces at most one impulse.
    pub fn consume_jump(&mut self) {
        self.jump_requested = false;
        self.held.remove(&Key::Jump);
    }

    /// Drop all input (on reset)
    pub fn clear(&mut self) {
        self.held.clear();
        self.jump_requested = false;
    }
}
