//! Form controllers
//!
//! Each controller owns its form values, validates the whole entity on
//! submit and reports the outcome through the notifier.

pub mod contest;
pub mod problem;
pub mod role;
pub mod steps;
pub mod taxonomy;
pub mod wizard;

pub use contest::{ContestForm, ContestFormValues, ContestLength, ProblemScoreSheet};
pub use problem::ProblemFormValues;
pub use role::{ensure_mutable, PermissionMatrix, RoleEditor, RoleFormValues, RowSelection};
pub use steps::{flag_steps, ProblemStep, PROBLEM_FIELD_STEPS};
pub use taxonomy::{save_tag, save_topic, TaxonomyFormValues};
pub use wizard::{ProblemWizard, WizardMode};

use validator::{ValidationErrors, ValidationErrorsKind};

/// Inline messages for one field of a failed validation
pub fn field_messages(errors: Option<&ValidationErrors>, field: &str) -> Vec<String> {
    let Some(errors) = errors else {
        return Vec::new();
    };

    match errors.errors().get(field) {
        Some(ValidationErrorsKind::Field(list)) => list
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect(),
        Some(_) => vec!["Invalid value".to_string()],
        None => Vec::new(),
    }
}
