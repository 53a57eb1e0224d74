//! Confirmation-gated row actions.
//!
//! A [`PendingAction`] is the open dialog. Nothing reaches the backend until
//! it is handed to `TableController::confirm`; dropping or cancelling it sends
//! nothing.

use uuid::Uuid;

/// Destructive or state-changing action on a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Activate,
    Deactivate,
    Delete,
}

impl RowAction {
    fn verb(&self) -> &'static str {
        match self {
            Self::Activate => "Activate",
            Self::Deactivate => "Deactivate",
            Self::Delete => "Delete",
        }
    }

    /// Toast text after the backend accepted the action
    pub fn success_message(&self, entity: &str) -> String {
        let done = match self {
            Self::Activate => "activated",
            Self::Deactivate => "deactivated",
            Self::Delete => "deleted",
        };
        format!("{entity} {done}")
    }
}

/// An action waiting for the user's answer
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending action does nothing until confirmed or cancelled"]
pub struct PendingAction {
    id: Uuid,
    action: RowAction,
    prompt: String,
}

impl PendingAction {
    pub fn new(id: Uuid, action: RowAction, entity: &str, label: &str) -> Self {
        Self {
            id,
            action,
            prompt: format!("{} {} \"{}\"?", action.verb(), entity.to_lowercase(), label),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn action(&self) -> RowAction {
        self.action
    }

    /// Question shown in the dialog
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}
