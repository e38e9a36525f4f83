//! Notifications emitted by rounds and sessions

use serde::Serialize;

/// Something observers may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// An update was applied
    Step { frame: u64 },
    BrickDestroyed { column: usize, row: usize },
    /// The last brick fell; `score` includes the bonus
    AllClear { score: u32 },
    /// A fresh grid replaced the cleared one
    GridRegenerated { generation: u32 },
    /// The ball reached the floor
    RoundOver { lives_remaining: i32 },
    /// Raised once, when the last life is lost
    SessionEnded { final_score: u32 },
}

/// Listener callback
pub type Listener = Box<dyn FnMut(&GameEvent)>;

/// Explicit observer list, notified synchronously in registration order
#[derive(Default)]
pub struct Observers {
    listeners: Vec<Listener>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, event: &GameEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
