//! The game log: ordered, human-readable messages about what happened.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameLog {
    entries: Vec<String>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "game_log", "{message}");
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.contains(needle))
    }
}
