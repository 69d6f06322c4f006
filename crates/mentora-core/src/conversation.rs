use mentora_schema::{Role, Turn};
use serde::{Deserialize, Serialize};

/// Append-only ordered record of one session's turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in insertion order, system preamble included.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    /// Display order: newest first, skipping the leading system preamble
    /// turns (they stay in storage, they just don't render).
    pub fn latest_first(&self) -> impl Iterator<Item = &Turn> {
        let preamble = self
            .turns
            .iter()
            .take_while(|t| t.role == Role::System)
            .count();
        self.turns[preamble..].iter().rev()
    }

    /// Wholesale swap, used only when restoring a persisted snapshot.
    pub fn replace(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
