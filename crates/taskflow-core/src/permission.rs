//! Permission Checks
//!
//! Owner beats explicit grants, explicit grants beat inherited ones. A folder
//! with no matching rule defers to its parent, so an ancestor's owner and
//! its grants reach every descendant.

use chrono::Utc;
use std::collections::HashSet;

use crate::domain::{
    find_by_id, new_id, FilePermission, Folder, FolderPermission, PermissionLevel, StoredFile,
};

/// Owner or explicit grant on the file itself
pub fn check_file_permission(file: &StoredFile, user_id: &str, required: PermissionLevel) -> bool {
    if file.created_by == user_id {
        return true;
    }
    file.permissions
        .iter()
        .find(|p| p.user_id == user_id)
        .is_some_and(|p| p.permission.grants(required))
}

/// File rules first, then the rules of the folder holding the file
pub fn check_file_access(
    file: &StoredFile,
    user_id: &str,
    required: PermissionLevel,
    folders: &[Folder],
) -> bool {
    if check_file_permission(file, user_id, required) {
        return true;
    }
    file.folder_id
        .as_deref()
        .and_then(|id| find_by_id(folders, id))
        .is_some_and(|folder| check_folder_permission(folder, user_id, required, folders))
}

/// Walk from the folder up to the root; the first owner or grant that
/// satisfies `required` wins. A parent cycle denies access.
pub fn check_folder_permission(
    folder: &Folder,
    user_id: &str,
    required: PermissionLevel,
    folders: &[Folder],
) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(folder);
    while let Some(folder) = current {
        if !visited.insert(folder.id.as_str()) {
            log::warn!("[PERMISSION] folder cycle detected at {}", folder.id);
            return false;
        }
        if folder_grants(folder, user_id, required) {
            return true;
        }
        current = folder.parent_id.as_deref().and_then(|id| find_by_id(folders, id));
    }
    false
}

fn folder_grants(folder: &Folder, user_id: &str, required: PermissionLevel) -> bool {
    folder.created_by == user_id
        || folder
            .permissions
            .iter()
            .find(|p| p.user_id == user_id)
            .is_some_and(|p| p.permission.grants(required))
}

/// Grant a permission, replacing any previous grant for the same user
pub fn add_file_permission(
    file: &mut StoredFile,
    user_id: &str,
    permission: PermissionLevel,
    granted_by: &str,
) -> FilePermission {
    file.permissions.retain(|p| p.user_id != user_id);
    let grant = FilePermission {
        id: new_id("perm"),
        user_id: user_id.to_string(),
        user_email: None,
        user_name: None,
        file_id: file.id.clone(),
        permission,
        created_at: Utc::now(),
        created_by: granted_by.to_string(),
    };
    file.permissions.push(grant.clone());
    grant
}

pub fn add_folder_permission(
    folder: &mut Folder,
    user_id: &str,
    permission: PermissionLevel,
    granted_by: &str,
    inherit: bool,
) -> FolderPermission {
    folder.permissions.retain(|p| p.user_id != user_id);
    let grant = FolderPermission {
        id: new_id("perm"),
        user_id: user_id.to_string(),
        user_email: None,
        user_name: None,
        folder_id: folder.id.clone(),
        permission,
        created_at: Utc::now(),
        created_by: granted_by.to_string(),
        inherit,
    };
    folder.permissions.push(grant.clone());
    grant
}

pub fn remove_file_permission(file: &mut StoredFile, user_id: &str) {
    file.permissions.retain(|p| p.user_id != user_id);
}

pub fn remove_folder_permission(folder: &mut Folder, user_id: &str) {
    folder.permissions.retain(|p| p.user_id != user_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use PermissionLevel::*;

    fn folder(id: &str, parent: Option<&str>, owner: &str) -> Folder {
        let now = Utc::now();
        Folder {
            id: id.into(),
            name: id.into(),
            parent_id: parent.map(Into::into),
            project_id: None,
            created_at: now,
            updated_at: now,
            created_by: owner.into(),
            path: id.into(),
            permissions: vec![],
        }
    }

    fn file(id: &str, folder_id: Option<&str>, owner: &str) -> StoredFile {
        let now = Utc::now();
        StoredFile {
            id: id.into(),
            name: format!("{}.txt", id),
            mime_type: "text/plain".into(),
            size: 1,
            url: String::new(),
            created_at: now,
            updated_at: now,
            created_by: owner.into(),
            folder_id: folder_id.map(Into::into),
            project_id: None,
            tags: vec![],
            description: None,
            thumbnail: None,
            favorite: false,
            permissions: vec![],
            version_history: vec![],
        }
    }

    #[test]
    fn test_owner_has_every_permission() {
        let f = file("f", None, "alice");
        assert!(check_file_permission(&f, "alice", Admin));
        assert!(!check_file_permission(&f, "bob", View));
    }

    #[test]
    fn test_explicit_file_grant_levels() {
        let mut f = file("f", None, "alice");
        add_file_permission(&mut f, "bob", Edit, "alice");
        assert!(check_file_permission(&f, "bob", View));
        assert!(check_file_permission(&f, "bob", Edit));
        assert!(!check_file_permission(&f, "bob", Delete));

        // Re-granting replaces the old grant
        add_file_permission(&mut f, "bob", View, "alice");
        assert_eq!(f.permissions.len(), 1);
        assert!(!check_file_permission(&f, "bob", Edit));

        remove_file_permission(&mut f, "bob");
        assert!(!check_file_permission(&f, "bob", View));
    }

    #[test]
    fn test_inherited_grant_flows_down_the_tree() {
        let mut root = folder("root", None, "alice");
        add_folder_permission(&mut root, "bob", Delete, "alice", true);
        let mid = folder("mid", Some("root"), "alice");
        let leaf = folder("leaf", Some("mid"), "alice");
        let folders = vec![root, mid, leaf.clone()];

        assert!(check_folder_permission(&leaf, "bob", Edit, &folders));
        assert!(!check_folder_permission(&leaf, "bob", Admin, &folders));
        assert!(!check_folder_permission(&leaf, "carol", View, &folders));
    }

    #[test]
    fn test_ancestor_grant_reaches_descendants_without_inherit_flag() {
        let mut root = folder("root", None, "alice");
        add_folder_permission(&mut root, "bob", View, "alice", false);
        let child = folder("child", Some("root"), "alice");
        let grandchild = folder("grandchild", Some("child"), "alice");
        let folders = vec![root.clone(), child.clone(), grandchild.clone()];

        assert!(check_folder_permission(&child, "bob", View, &folders));
        assert!(check_folder_permission(&grandchild, "bob", View, &folders));
        assert!(!check_folder_permission(&grandchild, "bob", Edit, &folders));
    }

    #[test]
    fn test_weaker_direct_grant_defers_to_stronger_ancestor_grant() {
        let mut root = folder("root", None, "alice");
        add_folder_permission(&mut root, "bob", Edit, "alice", true);
        let mut child = folder("child", Some("root"), "alice");
        add_folder_permission(&mut child, "bob", View, "alice", false);
        let folders = vec![root, child.clone()];

        assert!(check_folder_permission(&child, "bob", Edit, &folders));
        assert!(!check_folder_permission(&child, "bob", Delete, &folders));
    }

    #[test]
    fn test_ancestor_owner_has_access() {
        let root = folder("root", None, "bob");
        let child = folder("child", Some("root"), "alice");
        let folders = vec![root, child.clone()];
        assert!(check_folder_permission(&child, "bob", Delete, &folders));
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let a = folder("a", Some("b"), "alice");
        let b = folder("b", Some("a"), "alice");
        let folders = vec![a.clone(), b];
        assert!(!check_folder_permission(&a, "bob", View, &folders));
    }

    #[test]
    fn test_missing_parent_stops_walk() {
        let orphan = folder("orphan", Some("gone"), "alice");
        assert!(!check_folder_permission(&orphan, "bob", View, &[orphan.clone()]));
    }

    #[test]
    fn test_file_access_falls_back_to_folder() {
        let mut docs = folder("docs", None, "alice");
        add_folder_permission(&mut docs, "bob", View, "alice", true);
        let folders = vec![docs];
        let f = file("f", Some("docs"), "alice");

        assert!(check_file_access(&f, "bob", View, &folders));
        assert!(!check_file_access(&f, "bob", Edit, &folders));
        assert!(!check_file_access(&file("g", None, "alice"), "bob", View, &folders));
    }
}
