//! File Store
//!
//! Files and folders for the file manager. Folders nest through
//! `parent_id`; deleting a folder takes its whole subtree with it.

use chrono::Utc;
use std::collections::HashSet;

use crate::domain::{
    find_by_id, new_id, FilePermission, FileUpload, Folder, FolderDraft, FolderPermission,
    PermissionLevel, StoredFile,
};
use crate::error::FileError;
use crate::permission;

const DEFAULT_FOLDER_NAME: &str = "New Folder";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileStore {
    pub files: Vec<StoredFile>,
    pub folders: Vec<Folder>,
}

impl FileStore {
    pub fn new(files: Vec<StoredFile>, folders: Vec<Folder>) -> Self {
        Self { files, folders }
    }

    // ========================
    // Files
    // ========================

    pub fn upload_file(
        &mut self,
        upload: FileUpload,
        folder_id: Option<&str>,
        project_id: Option<&str>,
        user_id: &str,
    ) -> StoredFile {
        let mime_type = if upload.mime_type.is_empty() {
            mime_guess::from_path(&upload.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        } else {
            upload.mime_type
        };
        let thumbnail = mime_type.starts_with("image/").then(|| upload.url.clone());
        let now = Utc::now();

        let file = StoredFile {
            id: new_id("file"),
            name: upload.name,
            mime_type,
            size: upload.size,
            url: upload.url,
            created_at: now,
            updated_at: now,
            created_by: user_id.to_string(),
            folder_id: folder_id.map(str::to_string),
            project_id: project_id.map(str::to_string),
            tags: Vec::new(),
            description: None,
            thumbnail,
            favorite: false,
            permissions: Vec::new(),
            version_history: Vec::new(),
        };
        log::info!("[FILES] uploaded {} ({})", file.name, file.mime_type);
        self.files.push(file.clone());
        file
    }

    pub fn file(&self, id: &str) -> Option<&StoredFile> {
        find_by_id(&self.files, id)
    }

    pub fn download_url(&self, id: &str) -> Result<&str, FileError> {
        self.file(id)
            .map(|f| f.url.as_str())
            .ok_or_else(|| FileError::FileNotFound(id.to_string()))
    }

    pub fn delete_file(&mut self, id: &str) -> Option<StoredFile> {
        let pos = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(pos))
    }

    pub fn rename_file(&mut self, id: &str, name: &str) -> Result<&StoredFile, FileError> {
        let file = self.file_mut(id)?;
        file.name = name.to_string();
        file.updated_at = Utc::now();
        Ok(file)
    }

    /// Move a file into another folder (`None` = root)
    pub fn move_file(&mut self, id: &str, folder_id: Option<&str>) -> Result<&StoredFile, FileError> {
        if let Some(target) = folder_id {
            if find_by_id(&self.folders, target).is_none() {
                return Err(FileError::FolderNotFound(target.to_string()));
            }
        }
        let file = self.file_mut(id)?;
        file.folder_id = folder_id.map(str::to_string);
        file.updated_at = Utc::now();
        Ok(file)
    }

    /// Returns the new favourite flag
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, FileError> {
        let file = self.file_mut(id)?;
        file.favorite = !file.favorite;
        Ok(file.favorite)
    }

    pub fn files_in_folder(&self, folder_id: Option<&str>) -> Vec<&StoredFile> {
        self.files
            .iter()
            .filter(|f| f.folder_id.as_deref() == folder_id)
            .collect()
    }

    /// Case-insensitive match on name, description and tags
    pub fn search(&self, query: &str) -> Vec<&StoredFile> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.files.iter().collect();
        }
        self.files
            .iter()
            .filter(|f| {
                f.name.to_lowercase().contains(&needle)
                    || f.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || f.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn file_mut(&mut self, id: &str) -> Result<&mut StoredFile, FileError> {
        self.files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FileError::FileNotFound(id.to_string()))
    }

    // ========================
    // Folders
    // ========================

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        find_by_id(&self.folders, id)
    }

    pub fn create_folder(&mut self, draft: FolderDraft, user_id: &str) -> Folder {
        let name = draft
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string());
        let parent_id = draft.parent_id.filter(|p| !p.is_empty());
        let path = draft.path.unwrap_or_else(|| {
            match parent_id.as_deref().and_then(|p| self.folder(p)) {
                Some(parent) => format!("{}/{}", parent.path, name),
                None => name.clone(),
            }
        });
        let now = Utc::now();

        let folder = Folder {
            id: new_id("folder"),
            name,
            parent_id,
            project_id: draft.project_id,
            created_at: now,
            updated_at: now,
            created_by: user_id.to_string(),
            path,
            permissions: Vec::new(),
        };
        log::info!("[FILES] created folder {}", folder.path);
        self.folders.push(folder.clone());
        folder
    }

    /// Remove a folder, every folder below it and every file inside them.
    /// Returns the removed folder ids.
    pub fn delete_folder(&mut self, id: &str) -> Result<Vec<String>, FileError> {
        if self.folder(id).is_none() {
            return Err(FileError::FolderNotFound(id.to_string()));
        }

        let doomed = self.subtree_ids(id);
        let seen: HashSet<&str> = doomed.iter().map(String::as_str).collect();

        self.folders.retain(|f| !seen.contains(f.id.as_str()));
        self.files
            .retain(|f| f.folder_id.as_deref().map_or(true, |fid| !seen.contains(fid)));
        log::info!("[FILES] deleted {} folder(s)", doomed.len());
        Ok(doomed)
    }

    /// Re-parent a folder (`None` = root). Paths below it are rebuilt.
    pub fn move_folder(&mut self, id: &str, parent_id: Option<&str>) -> Result<&Folder, FileError> {
        if self.folder(id).is_none() {
            return Err(FileError::FolderNotFound(id.to_string()));
        }
        if let Some(target) = parent_id {
            if self.folder(target).is_none() {
                return Err(FileError::FolderNotFound(target.to_string()));
            }
            if self.subtree_ids(id).iter().any(|f| f == target) {
                return Err(FileError::InvalidMove);
            }
        }

        let now = Utc::now();
        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == id) {
            folder.parent_id = parent_id.map(str::to_string);
            folder.updated_at = now;
        }
        // Parents come before children in subtree order
        for folder_id in self.subtree_ids(id) {
            let parent_path = self
                .folder(&folder_id)
                .and_then(|f| f.parent_id.as_deref())
                .and_then(|p| self.folder(p))
                .map(|p| p.path.clone());
            if let Some(folder) = self.folders.iter_mut().find(|f| f.id == folder_id) {
                folder.path = match parent_path {
                    Some(parent) => format!("{}/{}", parent, folder.name),
                    None => folder.name.clone(),
                };
            }
        }
        self.folder(id).ok_or_else(|| FileError::FolderNotFound(id.to_string()))
    }

    // ========================
    // Sharing
    // ========================

    /// Grant `user_id` a level on a file. Only someone holding admin on the
    /// file (directly or through its folder) may share it.
    pub fn share_file(
        &mut self,
        file_id: &str,
        granted_by: &str,
        user_id: &str,
        level: PermissionLevel,
    ) -> Result<FilePermission, FileError> {
        let file = self.shareable_file(file_id, granted_by)?;
        Ok(permission::add_file_permission(file, user_id, level, granted_by))
    }

    pub fn unshare_file(&mut self, file_id: &str, removed_by: &str, user_id: &str) -> Result<(), FileError> {
        let file = self.shareable_file(file_id, removed_by)?;
        permission::remove_file_permission(file, user_id);
        Ok(())
    }

    fn shareable_file(&mut self, file_id: &str, user_id: &str) -> Result<&mut StoredFile, FileError> {
        let file = self
            .files
            .iter()
            .find(|f| f.id == file_id)
            .ok_or_else(|| FileError::FileNotFound(file_id.to_string()))?;
        if !permission::check_file_access(file, user_id, PermissionLevel::Admin, &self.folders) {
            log::warn!("[FILES] {} may not share {}", user_id, file_id);
            return Err(FileError::PermissionDenied(file.name.clone()));
        }
        self.files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| FileError::FileNotFound(file_id.to_string()))
    }

    /// Grant on a folder, same admin rule as files
    pub fn share_folder(
        &mut self,
        folder_id: &str,
        granted_by: &str,
        user_id: &str,
        level: PermissionLevel,
        inherit: bool,
    ) -> Result<FolderPermission, FileError> {
        let folder = self
            .folder(folder_id)
            .ok_or_else(|| FileError::FolderNotFound(folder_id.to_string()))?;
        if !permission::check_folder_permission(folder, granted_by, PermissionLevel::Admin, &self.folders) {
            log::warn!("[FILES] {} may not share {}", granted_by, folder_id);
            return Err(FileError::PermissionDenied(folder.name.clone()));
        }
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or_else(|| FileError::FolderNotFound(folder_id.to_string()))?;
        Ok(permission::add_folder_permission(folder, user_id, level, granted_by, inherit))
    }

    /// The folder and everything below it, breadth first
    fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut ids: Vec<String> = vec![id.to_string()];
        let mut seen: HashSet<String> = HashSet::from([id.to_string()]);
        let mut cursor = 0;
        while cursor < ids.len() {
            let current = ids[cursor].clone();
            for child in self.folders.iter().filter(|f| f.parent_id.as_deref() == Some(current.as_str())) {
                if seen.insert(child.id.clone()) {
                    ids.push(child.id.clone());
                }
            }
            cursor += 1;
        }
        ids
    }

    pub fn subfolders(&self, parent_id: Option<&str>) -> Vec<&Folder> {
        self.folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .collect()
    }

    /// Root-to-folder chain, stopping at missing parents or a cycle
    pub fn breadcrumbs(&self, folder_id: &str) -> Vec<&Folder> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.folder(folder_id);
        while let Some(folder) = current {
            if !seen.insert(folder.id.as_str()) {
                break;
            }
            chain.push(folder);
            current = folder.parent_id.as_deref().and_then(|p| self.folder(p));
        }
        chain.reverse();
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, mime: &str) -> FileUpload {
        FileUpload {
            name: name.into(),
            mime_type: mime.into(),
            size: 42,
            url: format!("blob:{}", name),
        }
    }

    fn named(name: &str, parent: Option<&str>) -> FolderDraft {
        FolderDraft {
            name: Some(name.into()),
            parent_id: parent.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn test_upload_assigns_id_and_thumbnail() {
        let mut store = FileStore::default();
        let image = store.upload_file(upload("cat.png", "image/png"), None, Some("p1"), "u1");
        assert!(image.id.starts_with("file-"));
        assert_eq!(image.thumbnail.as_deref(), Some("blob:cat.png"));
        assert_eq!(image.project_id.as_deref(), Some("p1"));
        assert_eq!(image.created_by, "u1");

        let doc = store.upload_file(upload("notes.txt", "text/plain"), None, None, "u1");
        assert_eq!(doc.thumbnail, None);
        assert_eq!(store.files.len(), 2);
    }

    #[test]
    fn test_upload_guesses_missing_mime_type() {
        let mut store = FileStore::default();
        let file = store.upload_file(upload("report.pdf", ""), None, None, "u1");
        assert_eq!(file.mime_type, "application/pdf");

        let unknown = store.upload_file(upload("blob.zzzunknown", ""), None, None, "u1");
        assert_eq!(unknown.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_download_url_of_unknown_file_fails() {
        let mut store = FileStore::default();
        let file = store.upload_file(upload("a.txt", "text/plain"), None, None, "u1");
        assert_eq!(store.download_url(&file.id), Ok("blob:a.txt"));
        assert_eq!(
            store.download_url("nope"),
            Err(FileError::FileNotFound("nope".into()))
        );
    }

    #[test]
    fn test_create_folder_defaults() {
        let mut store = FileStore::default();
        let root = store.create_folder(FolderDraft::default(), "u1");
        assert_eq!(root.name, "New Folder");
        assert_eq!(root.path, "New Folder");
        assert!(root.id.starts_with("folder-"));

        let docs = store.create_folder(named("Docs", None), "u1");
        let specs = store.create_folder(named("Specs", Some(&docs.id)), "u1");
        assert_eq!(specs.path, "Docs/Specs");
        assert_eq!(store.subfolders(Some(&docs.id)).len(), 1);
        assert_eq!(store.subfolders(None).len(), 2);
    }

    #[test]
    fn test_delete_folder_removes_subtree_and_files() {
        let mut store = FileStore::default();
        let a = store.create_folder(named("A", None), "u1");
        let b = store.create_folder(named("B", Some(&a.id)), "u1");
        let c = store.create_folder(named("C", Some(&b.id)), "u1");
        let keep = store.create_folder(named("Keep", None), "u1");
        store.upload_file(upload("deep.txt", "text/plain"), Some(&c.id), None, "u1");
        store.upload_file(upload("top.txt", "text/plain"), Some(&a.id), None, "u1");
        store.upload_file(upload("safe.txt", "text/plain"), Some(&keep.id), None, "u1");
        store.upload_file(upload("root.txt", "text/plain"), None, None, "u1");

        let removed = store.delete_folder(&a.id).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(store.folders.len(), 1);
        let names: Vec<_> = store.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["safe.txt", "root.txt"]);

        assert!(store.delete_folder(&a.id).is_err());
    }

    #[test]
    fn test_breadcrumbs_root_first_and_cycle_safe() {
        let mut store = FileStore::default();
        let a = store.create_folder(named("A", None), "u1");
        let b = store.create_folder(named("B", Some(&a.id)), "u1");
        let crumbs: Vec<_> = store.breadcrumbs(&b.id).iter().map(|f| f.name.clone()).collect();
        assert_eq!(crumbs, vec!["A", "B"]);

        store.folders[0].parent_id = Some(b.id.clone());
        assert_eq!(store.breadcrumbs(&b.id).len(), 2);
    }

    #[test]
    fn test_rename_move_favorite_search() {
        let mut store = FileStore::default();
        let folder = store.create_folder(named("Docs", None), "u1");
        let file = store.upload_file(upload("draft.md", "text/markdown"), None, None, "u1");

        store.rename_file(&file.id, "final.md").unwrap();
        store.move_file(&file.id, Some(&folder.id)).unwrap();
        assert!(store.toggle_favorite(&file.id).unwrap());
        assert_eq!(store.files_in_folder(Some(&folder.id)).len(), 1);
        assert!(store.move_file(&file.id, Some("missing")).is_err());

        store.files[0].tags.push("Quarterly".into());
        assert_eq!(store.search("final").len(), 1);
        assert_eq!(store.search("quarter").len(), 1);
        assert!(store.search("nothing").is_empty());
    }

    #[test]
    fn test_move_folder_rewrites_paths() {
        let mut store = FileStore::default();
        let a = store.create_folder(named("A", None), "u1");
        let b = store.create_folder(named("B", Some(&a.id)), "u1");
        let c = store.create_folder(named("C", Some(&b.id)), "u1");
        let x = store.create_folder(named("X", None), "u1");

        assert_eq!(store.move_folder(&b.id, Some(&x.id)).unwrap().path, "X/B");
        assert_eq!(store.folder(&c.id).unwrap().path, "X/B/C");
        assert_eq!(store.subfolders(Some(&a.id)).len(), 0);

        assert_eq!(store.move_folder(&x.id, Some(&c.id)), Err(FileError::InvalidMove));
        assert_eq!(store.move_folder(&x.id, Some(&x.id)), Err(FileError::InvalidMove));

        store.move_folder(&b.id, None).unwrap();
        assert_eq!(store.folder(&c.id).unwrap().path, "B/C");
    }

    #[test]
    fn test_sharing_needs_admin_on_the_file() {
        let mut store = FileStore::default();
        let file = store.upload_file(upload("plan.txt", "text/plain"), None, None, "alice");

        assert_eq!(
            store.share_file(&file.id, "bob", "carol", PermissionLevel::View),
            Err(FileError::PermissionDenied("plan.txt".into()))
        );
        store.share_file(&file.id, "alice", "bob", PermissionLevel::Edit).unwrap();
        // Edit is not enough to pass access on
        assert!(store.share_file(&file.id, "bob", "carol", PermissionLevel::View).is_err());

        store.share_file(&file.id, "alice", "bob", PermissionLevel::Admin).unwrap();
        let grant = store.share_file(&file.id, "bob", "carol", PermissionLevel::View).unwrap();
        assert_eq!(grant.created_by, "bob");
        assert_eq!(store.file(&file.id).unwrap().permissions.len(), 2);

        assert!(store.unshare_file(&file.id, "carol", "bob").is_err());
        store.unshare_file(&file.id, "alice", "carol").unwrap();
        assert_eq!(store.file(&file.id).unwrap().permissions.len(), 1);
        assert_eq!(
            store.share_file("file-missing", "alice", "bob", PermissionLevel::View),
            Err(FileError::FileNotFound("file-missing".into()))
        );
    }

    #[test]
    fn test_folder_admin_can_share_files_inside() {
        let mut store = FileStore::default();
        let docs = store.create_folder(named("Docs", None), "alice");
        let file = store.upload_file(upload("a.txt", "text/plain"), Some(&docs.id), None, "alice");

        assert!(store.share_folder(&docs.id, "bob", "bob", PermissionLevel::Admin, true).is_err());
        store.share_folder(&docs.id, "alice", "bob", PermissionLevel::Admin, true).unwrap();
        store.share_file(&file.id, "bob", "carol", PermissionLevel::View).unwrap();
        assert_eq!(
            store.share_folder("folder-missing", "alice", "bob", PermissionLevel::View, true),
            Err(FileError::FolderNotFound("folder-missing".into()))
        );
    }
}
