//! Role and permission models

use serde::{Deserialize, Serialize};

use super::{PermissionId, RoleId};

/// A single grantable capability, e.g. `problems:create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: PermissionId,
    pub resource: String,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Named bundle of permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: i32,
    pub is_system_role: bool,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Body of the create/update role calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePayload {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: i32,
    pub permission_ids: Vec<PermissionId>,
}
