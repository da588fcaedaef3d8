//! Project Directory
//!
//! Nested projects. `path` holds the chain of ancestor ids plus the
//! project's own id joined with `/`; `level` is the number of ancestors.

use chrono::Utc;
use std::collections::HashSet;

use crate::domain::{find_by_id, Project, ProjectDraft, ProjectNode, Task};
use crate::error::ProjectError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDirectory {
    projects: Vec<Project>,
}

impl ProjectDirectory {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn all(&self) -> &[Project] {
        &self.projects
    }

    pub fn by_id(&self, id: &str) -> Option<&Project> {
        find_by_id(&self.projects, id)
    }

    pub fn roots(&self) -> Vec<&Project> {
        self.children(None)
    }

    pub fn children(&self, parent_id: Option<&str>) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.parent_id.as_deref() == parent_id)
            .collect()
    }

    /// Every project below `id`, depth-first
    pub fn descendants(&self, id: &str) -> Vec<&Project> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id.to_string()]);
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            for child in self.children(Some(&current)).into_iter().rev() {
                if seen.insert(child.id.clone()) {
                    stack.push(child.id.clone());
                    out.push(child);
                }
            }
        }
        out
    }

    pub fn hierarchy(&self) -> Vec<ProjectNode> {
        let mut seen = HashSet::new();
        self.roots()
            .into_iter()
            .map(|p| self.node(p, &mut seen))
            .collect()
    }

    fn node(&self, project: &Project, seen: &mut HashSet<String>) -> ProjectNode {
        seen.insert(project.id.clone());
        let children = self
            .children(Some(&project.id))
            .into_iter()
            .filter(|c| !seen.contains(&c.id))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|c| self.node(c, seen))
            .collect();
        ProjectNode {
            project: project.clone(),
            children,
        }
    }

    /// Root-to-project chain
    pub fn breadcrumbs(&self, id: &str) -> Vec<&Project> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.by_id(id);
        while let Some(project) = current {
            if !seen.insert(project.id.as_str()) {
                break;
            }
            chain.push(project);
            current = project.parent_id.as_deref().and_then(|p| self.by_id(p));
        }
        chain.reverse();
        chain
    }

    // ========================
    // Mutations
    // ========================

    pub fn add(&mut self, draft: ProjectDraft) -> Result<Project, ProjectError> {
        let parent_id = draft.parent_id.filter(|p| !p.is_empty());
        if let Some(parent) = parent_id.as_deref() {
            if self.by_id(parent).is_none() {
                return Err(ProjectError::NotFound(parent.to_string()));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let (path, level) = self.placement(&id, parent_id.as_deref());
        let project = Project {
            id,
            name: draft.name,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status,
            priority: draft.priority,
            progress: 0,
            team_members: draft.team_members,
            created_by: draft.created_by,
            created_at: Utc::now(),
            tags: draft.tags,
            parent_id,
            path,
            level,
        };
        log::info!("[PROJECTS] added {} at {}", project.name, project.path);
        self.projects.push(project.clone());
        Ok(project)
    }

    /// Replace a project. A changed parent rewrites the path and level of
    /// the project and everything below it.
    pub fn update(&mut self, mut project: Project) -> Result<Project, ProjectError> {
        let Some(pos) = self.projects.iter().position(|p| p.id == project.id) else {
            return Err(ProjectError::NotFound(project.id));
        };
        project.parent_id = project.parent_id.filter(|p| !p.is_empty());

        if let Some(parent) = project.parent_id.as_deref() {
            if parent == project.id || self.descendants(&project.id).iter().any(|d| d.id == parent) {
                return Err(ProjectError::InvalidParent(project.id));
            }
            if self.by_id(parent).is_none() {
                return Err(ProjectError::NotFound(parent.to_string()));
            }
        }

        let reparented = self.projects[pos].parent_id != project.parent_id;
        let (path, level) = self.placement(&project.id, project.parent_id.as_deref());
        project.path = path;
        project.level = level;
        self.projects[pos] = project.clone();

        if reparented {
            self.rewrite_subtree(&project.id);
        }
        Ok(project)
    }

    /// Remove a project and all of its descendants; returns removed ids
    pub fn delete(&mut self, id: &str) -> Result<Vec<String>, ProjectError> {
        if self.by_id(id).is_none() {
            return Err(ProjectError::NotFound(id.to_string()));
        }
        let mut doomed: Vec<String> = vec![id.to_string()];
        doomed.extend(self.descendants(id).into_iter().map(|p| p.id.clone()));
        self.projects.retain(|p| !doomed.contains(&p.id));
        Ok(doomed)
    }

    /// Percent of the project's tasks that are finished
    pub fn progress_from_tasks(&self, id: &str, tasks: &[Task]) -> u8 {
        let mine: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(id))
            .collect();
        if mine.is_empty() {
            return self.by_id(id).map_or(0, |p| p.progress);
        }
        let done = mine.iter().filter(|t| t.status.is_finished()).count();
        ((done * 100) / mine.len()) as u8
    }

    fn placement(&self, id: &str, parent_id: Option<&str>) -> (String, u32) {
        let path = match parent_id.and_then(|p| self.by_id(p)) {
            Some(parent) if !parent.path.is_empty() => format!("{}/{}", parent.path, id),
            _ => id.to_string(),
        };
        let level = path.matches('/').count() as u32;
        (path, level)
    }

    fn rewrite_subtree(&mut self, id: &str) {
        let child_ids: Vec<String> = self
            .descendants(id)
            .into_iter()
            .map(|p| p.id.clone())
            .collect();
        // descendants() is parent-before-child, so parents are already fixed
        for child_id in child_ids {
            let Some(pos) = self.projects.iter().position(|p| p.id == child_id) else {
                continue;
            };
            let parent = self.projects[pos].parent_id.clone();
            let (path, level) = self.placement(&child_id, parent.as_deref());
            self.projects[pos].path = path;
            self.projects[pos].level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, ProjectStatus, TaskStatus};
    use chrono::NaiveDate;

    fn draft(name: &str, parent: Option<&str>) -> ProjectDraft {
        ProjectDraft {
            name: name.into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            status: ProjectStatus::Active,
            priority: Priority::Medium,
            team_members: vec![],
            created_by: "admin".into(),
            tags: vec![],
            parent_id: parent.map(Into::into),
        }
    }

    #[test]
    fn test_add_derives_path_and_level() {
        let mut dir = ProjectDirectory::default();
        let root = dir.add(draft("Website", None)).unwrap();
        let child = dir.add(draft("Landing", Some(&root.id))).unwrap();
        let grandchild = dir.add(draft("Hero", Some(&child.id))).unwrap();

        assert_eq!(root.path, root.id);
        assert_eq!(root.level, 0);
        assert_eq!(child.path, format!("{}/{}", root.id, child.id));
        assert_eq!(grandchild.level, 2);
        assert!(dir.add(draft("Orphan", Some("missing"))).is_err());
    }

    #[test]
    fn test_reparent_rewrites_subtree() {
        let mut dir = ProjectDirectory::default();
        let a = dir.add(draft("A", None)).unwrap();
        let b = dir.add(draft("B", None)).unwrap();
        let c = dir.add(draft("C", Some(&a.id))).unwrap();
        let d = dir.add(draft("D", Some(&c.id))).unwrap();

        let mut moved = dir.by_id(&c.id).unwrap().clone();
        moved.parent_id = Some(b.id.clone());
        dir.update(moved).unwrap();

        let d = dir.by_id(&d.id).unwrap();
        assert_eq!(d.path, format!("{}/{}/{}", b.id, c.id, d.id));
        assert_eq!(d.level, 2);
        assert!(dir.children(Some(&a.id)).is_empty());
    }

    #[test]
    fn test_cannot_move_under_own_descendant() {
        let mut dir = ProjectDirectory::default();
        let a = dir.add(draft("A", None)).unwrap();
        let b = dir.add(draft("B", Some(&a.id))).unwrap();

        let mut bad = dir.by_id(&a.id).unwrap().clone();
        bad.parent_id = Some(b.id.clone());
        assert_eq!(dir.update(bad), Err(ProjectError::InvalidParent(a.id.clone())));
    }

    #[test]
    fn test_delete_cascades() {
        let mut dir = ProjectDirectory::default();
        let a = dir.add(draft("A", None)).unwrap();
        let b = dir.add(draft("B", Some(&a.id))).unwrap();
        dir.add(draft("C", Some(&b.id))).unwrap();
        dir.add(draft("Other", None)).unwrap();

        assert_eq!(dir.delete(&a.id).unwrap().len(), 3);
        assert_eq!(dir.all().len(), 1);
    }

    #[test]
    fn test_hierarchy_and_breadcrumbs() {
        let mut dir = ProjectDirectory::default();
        let a = dir.add(draft("A", None)).unwrap();
        let b = dir.add(draft("B", Some(&a.id))).unwrap();
        dir.add(draft("Z", None)).unwrap();

        let tree = dir.hierarchy();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children[0].project.name, "B");

        let names: Vec<_> = dir.breadcrumbs(&b.id).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_progress_from_tasks() {
        let mut dir = ProjectDirectory::default();
        let p = dir.add(draft("P", None)).unwrap();
        let mut tasks = vec![
            Task::new("1", "one", TaskStatus::Done),
            Task::new("2", "two", TaskStatus::Completed),
            Task::new("3", "three", TaskStatus::Todo),
            Task::new("4", "four", TaskStatus::Review),
        ];
        for t in &mut tasks {
            t.project_id = Some(p.id.clone());
        }
        assert_eq!(dir.progress_from_tasks(&p.id, &tasks), 50);
        assert_eq!(dir.progress_from_tasks(&p.id, &[]), 0);
    }
}
