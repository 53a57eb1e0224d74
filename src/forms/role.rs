//! Role form and permission matrix.
//!
//! System roles are read-only: they can be viewed but never opened for
//! editing or deleted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use validator::{Validate, ValidationErrors};

use crate::constants::{MAX_NAME_LENGTH, MAX_TAXONOMY_DESCRIPTION_LENGTH, MIN_NAME_LENGTH};
use crate::error::{AdminError, AdminResult};
use crate::forms::field_messages;
use crate::models::{Permission, PermissionId, Role, RoleId, RolePayload};
use crate::notify::{Notifier, Toast};
use crate::services::RolesService;
use crate::state::AdminState;
use crate::utils::validation::{
    sanitize_optional, sanitize_string, slugify, validate_not_blank, validate_slug,
};

/// Refuse any mutation of a system role
pub fn ensure_mutable(role: &Role) -> AdminResult<()> {
    if role.is_system_role {
        return Err(AdminError::Forbidden(format!(
            "System role '{}' cannot be modified",
            role.name
        )));
    }
    Ok(())
}

/// Permissions grouped by resource, each row sorted by action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMatrix {
    rows: BTreeMap<String, Vec<Permission>>,
}

/// How much of a matrix row is granted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSelection {
    None,
    Partial,
    All,
}

impl PermissionMatrix {
    pub fn new(permissions: Vec<Permission>) -> Self {
        let mut rows: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
        for permission in permissions {
            rows.entry(permission.resource.clone())
                .or_default()
                .push(permission);
        }
        for row in rows.values_mut() {
            row.sort_by(|a, b| a.action.cmp(&b.action));
        }
        Self { rows }
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn row(&self, resource: &str) -> &[Permission] {
        self.rows.get(resource).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Values of the role dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct RoleFormValues {
    #[validate(
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "Name is required"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = MAX_TAXONOMY_DESCRIPTION_LENGTH, message = "Description is too long"))]
    pub description: Option<String>,

    pub priority: i32,
    pub permission_ids: BTreeSet<PermissionId>,

    /// Set once the user typed a slug; stops the slug following the name
    slug_edited: bool,
}

impl RoleFormValues {
    pub fn from_role(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            slug: role.slug.clone(),
            description: role.description.clone(),
            priority: role.priority,
            permission_ids: role.permissions.iter().map(|p| p.id).collect(),
            slug_edited: true,
        }
    }

    /// Change the name, re-deriving the slug unless it was typed by hand
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if !self.slug_edited {
            self.slug = slugify(&self.name);
        }
    }

    /// Type a slug. Clearing it hands control back to the name.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        let slug = slug.into();
        if slug.trim().is_empty() {
            self.slug_edited = false;
            self.slug = slugify(&self.name);
        } else {
            self.slug_edited = true;
            self.slug = slug.trim().to_string();
        }
    }

    /// Flip one permission. Returns whether it is now granted.
    pub fn toggle_permission(&mut self, id: PermissionId) -> bool {
        if self.permission_ids.remove(&id) {
            false
        } else {
            self.permission_ids.insert(id);
            true
        }
    }

    pub fn row_selection(&self, matrix: &PermissionMatrix, resource: &str) -> RowSelection {
        let row = matrix.row(resource);
        let granted = row
            .iter()
            .filter(|p| self.permission_ids.contains(&p.id))
            .count();

        match granted {
            0 => RowSelection::None,
            n if n == row.len() => RowSelection::All,
            _ => RowSelection::Partial,
        }
    }

    /// Grant the whole row, or revoke it if it is already fully granted
    pub fn toggle_resource(&mut self, matrix: &PermissionMatrix, resource: &str) {
        let row = matrix.row(resource);
        if self.row_selection(matrix, resource) == RowSelection::All {
            for permission in row {
                self.permission_ids.remove(&permission.id);
            }
        } else {
            self.permission_ids.extend(row.iter().map(|p| p.id));
        }
    }

    pub fn to_payload(&self) -> RolePayload {
        RolePayload {
            name: sanitize_string(&self.name),
            slug: self.slug.clone(),
            description: sanitize_optional(self.description.as_deref()),
            priority: self.priority,
            permission_ids: self.permission_ids.iter().copied().collect(),
        }
    }
}

/// Controller behind the role create/edit dialog
pub struct RoleEditor {
    roles: Arc<dyn RolesService>,
    notifier: Arc<dyn Notifier>,
    role_id: Option<RoleId>,
    values: RoleFormValues,
    matrix: PermissionMatrix,
    errors: Option<ValidationErrors>,
}

impl RoleEditor {
    /// Open the dialog for a new role
    pub async fn create(state: &AdminState) -> AdminResult<Self> {
        Self::open(state, None, RoleFormValues::default()).await
    }

    /// Open the dialog for an existing role. System roles are refused before
    /// anything is fetched.
    pub async fn edit(state: &AdminState, role: &Role) -> AdminResult<Self> {
        if let Err(e) = ensure_mutable(role) {
            tracing::warn!(role = %role.slug, "refusing to edit system role");
            state.notifier().notify(Toast::warning(e.user_message()));
            return Err(e);
        }
        Self::open(state, Some(role.id), RoleFormValues::from_role(role)).await
    }

    async fn open(
        state: &AdminState,
        role_id: Option<RoleId>,
        values: RoleFormValues,
    ) -> AdminResult<Self> {
        let roles = state.roles();
        let notifier = state.notifier();

        let permissions = match roles.permissions().await {
            Ok(permissions) => permissions,
            Err(e) => {
                let err = AdminError::from(e);
                tracing::error!("failed to load permissions: {}", err);
                notifier.notify(Toast::error(err.user_message()));
                return Err(err);
            }
        };

        Ok(Self {
            roles,
            notifier,
            role_id,
            values,
            matrix: PermissionMatrix::new(permissions),
            errors: None,
        })
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    pub fn values(&self) -> &RoleFormValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut RoleFormValues {
        &mut self.values
    }

    /// Grant or revoke a whole matrix row
    pub fn toggle_resource(&mut self, resource: &str) {
        self.values.toggle_resource(&self.matrix, resource);
    }

    pub fn field_messages(&self, field: &str) -> Vec<String> {
        field_messages(self.errors.as_ref(), field)
    }

    pub async fn submit(&mut self) -> AdminResult<Role> {
        if let Err(errors) = self.values.validate() {
            tracing::warn!("role form has validation errors");
            self.notifier
                .notify(Toast::error("Please fix the highlighted fields"));
            self.errors = Some(errors.clone());
            return Err(AdminError::Validation(errors));
        }
        self.errors = None;

        let payload = self.values.to_payload();
        let result = match self.role_id {
            None => self.roles.create(&payload).await,
            Some(id) => self.roles.update(id, &payload).await,
        };

        match result {
            Ok(role) => {
                let verb = if self.role_id.is_none() { "created" } else { "updated" };
                tracing::info!(role = %role.slug, "role {}", verb);
                self.notifier.notify(Toast::success(format!("Role {verb}")));
                self.role_id = Some(role.id);
                Ok(role)
            }
            Err(e) => {
                let err = AdminError::from(e);
                tracing::error!("failed to save role: {}", err);
                self.notifier.notify(Toast::error(err.user_message()));
                Err(err)
            }
        }
    }
}
