//! Permission catalog, well-known role codes, and permission resolution.
//!
//! The back office grants capabilities per role; users can additionally hold
//! extra permissions on top of their role. The effective set is the union.

use serde::Serialize;

pub const SYS_VIEW: &str = "SYS_VIEW";
pub const SYS_ADMIN: &str = "SYS_ADMIN";
pub const USER_READ: &str = "USER_READ";
pub const USER_WRITE: &str = "USER_WRITE";
pub const ROLE_MANAGE: &str = "ROLE_MANAGE";
pub const PROMPT_READ: &str = "PROMPT_READ";
pub const PROMPT_WRITE: &str = "PROMPT_WRITE";
pub const ASSET_MANAGE: &str = "ASSET_MANAGE";
pub const VIDEO_GEN: &str = "VIDEO_GEN";

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_EDITOR: &str = "EDITOR";
pub const ROLE_VIEWER: &str = "VIEWER";

/// Permissions granted to a freshly created role.
pub const NEW_ROLE_PERMISSIONS: &[&str] = &[SYS_VIEW];

/// One entry of the permission catalog shown in the role editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionDef {
    pub id: &'static str,
    pub category: &'static str,
    pub label: &'static str,
}

/// Every permission the studio knows about, grouped by category.
pub const PERMISSIONS: &[PermissionDef] = &[
    PermissionDef { id: SYS_VIEW, category: "系统", label: "访问后台" },
    PermissionDef { id: SYS_ADMIN, category: "系统", label: "系统设置管理" },
    PermissionDef { id: USER_READ, category: "用户", label: "查看用户列表" },
    PermissionDef { id: USER_WRITE, category: "用户", label: "编辑/新增用户" },
    PermissionDef { id: ROLE_MANAGE, category: "用户", label: "角色权限配置" },
    PermissionDef { id: PROMPT_READ, category: "提示词", label: "查看提示词配置" },
    PermissionDef { id: PROMPT_WRITE, category: "提示词", label: "修改提示词模板" },
    PermissionDef { id: ASSET_MANAGE, category: "业务", label: "资产管理" },
    PermissionDef { id: VIDEO_GEN, category: "业务", label: "视频生成能力" },
];

/// Whether `id` names a permission from [`PERMISSIONS`].
pub fn is_known_permission(id: &str) -> bool {
    PERMISSIONS.iter().any(|p| p.id == id)
}

/// Union of role and extra permissions, role permissions first, duplicates removed.
pub fn effective_permissions(role_permissions: &[String], extra: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(role_permissions.len() + extra.len());
    for p in role_permissions.iter().chain(extra) {
        if !out.contains(p) {
            out.push(p.clone());
        }
    }
    out
}

/// Add `permission` if absent, remove it if present. Returns whether it is now granted.
pub fn toggle_permission(permissions: &mut Vec<String>, permission: &str) -> bool {
    if let Some(pos) = permissions.iter().position(|p| p == permission) {
        permissions.remove(pos);
        false
    } else {
        permissions.push(permission.to_string());
        true
    }
}
