//! Conversational session handle.
//!
//! The REST provider keeps no server-side state, so the session carries the
//! persona instruction and the turn history and replays both on every send.
//! History only grows on successful exchanges.

use super::wire::{Content, Part};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    system_instruction: String,
    history: Vec<Content>,
}

impl ChatSession {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            history: Vec::new(),
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Provider-side turns recorded so far (user and model alternating).
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Turns to send for a new user `message`: the history plus the message.
    pub(crate) fn contents_with(&self, message: &str) -> Vec<Content> {
        let mut contents = self.history.clone();
        contents.push(Content::user(vec![Part::text(message)]));
        contents
    }

    pub(crate) fn record_exchange(&mut self, message: &str, reply: &str) {
        self.history.push(Content::user(vec![Part::text(message)]));
        self.history.push(Content::model(reply));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_with_does_not_mutate_history() {
        let session = ChatSession::new("persona");
        let contents = session.contents_with("hola");
        assert_eq!(contents.len(), 1);
        assert!(session.history().is_empty());
    }

    #[test]
    fn record_exchange_appends_user_then_model() {
        let mut session = ChatSession::new("persona");
        session.record_exchange("¿qué es la libertad?", "Mirá, che...");
        let roles: Vec<_> = session
            .history()
            .iter()
            .map(|c| c.role.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(roles, ["user", "model"]);
        assert_eq!(session.contents_with("otra").len(), 3);
    }
}
