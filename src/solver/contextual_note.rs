use std::fmt;
use std::sync::Arc;

use super::policy_context::PolicyContext;
use crate::models::Note;

/// An actor's policy context together with its current assignment slot
///
/// The policy context is shared; the note slot is the only thing that
/// changes during search and `replicate` gives the copy its own slot.
#[derive(Debug, Clone)]
pub struct ContextualNote {
    policy_context: Arc<PolicyContext>,
    note: Option<Note>,
}

impl ContextualNote {
    pub fn new(policy_context: Arc<PolicyContext>) -> Self {
        Self {
            policy_context,
            note: None,
        }
    }

    pub fn with_note(policy_context: Arc<PolicyContext>, note: Note) -> Self {
        Self {
            policy_context,
            note: Some(note),
        }
    }

    pub fn policy_context(&self) -> &Arc<PolicyContext> {
        &self.policy_context
    }

    pub fn note(&self) -> Option<&Note> {
        self.note.as_ref()
    }

    pub fn is_assigned(&self) -> bool {
        self.note.is_some()
    }

    pub fn set_note(&mut self, note: Option<Note>) {
        self.note = note;
    }

    /// Copy sharing the policy context, with an independent slot
    pub fn replicate(&self) -> Self {
        Self {
            policy_context: Arc::clone(&self.policy_context),
            note: self.note,
        }
    }
}

impl fmt::Display for ContextualNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.note {
            Some(note) => write!(f, "[{}, {}]", self.policy_context, note),
            None => write!(f, "[{}, None]", self.policy_context),
        }
    }
}
