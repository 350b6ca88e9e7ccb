//! Degraded-success results.
//!
//! Operations that recover locally return an [`Outcome`] instead of a
//! `Result`: the caller always gets a usable value, and can still tell a
//! substitute apart from the real thing.

use super::error::GenerationError;

/// A value that is either the genuine article or a local substitute.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    /// The provider produced the value.
    Complete(T),
    /// The provider failed; `value` is a placeholder built locally.
    Degraded { value: T, cause: GenerationError },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Complete(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Complete(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    /// Why the value was substituted, if it was.
    pub fn cause(&self) -> Option<&GenerationError> {
        match self {
            Outcome::Complete(_) => None,
            Outcome::Degraded { cause, .. } => Some(cause),
        }
    }
}
