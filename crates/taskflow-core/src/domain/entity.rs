//! Domain Layer - Core Entity Trait
//!
//! Every record the UI keeps in memory has a string identifier. The helpers
//! below are the linear-scan lookups the state containers share.

/// Core trait for all domain entities
pub trait Entity: Clone {
    /// Returns the entity's unique identifier
    fn id(&self) -> &str;
}

/// Generate a prefixed identifier, e.g. `task-<uuid>`
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// Find an entity by ID
pub fn find_by_id<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Replace the entity with the same ID, returning false when absent
pub fn replace_by_id<T: Entity>(items: &mut [T], updated: T) -> bool {
    match items.iter_mut().find(|item| item.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Remove the entity with the given ID, returning it if present
pub fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Thing {
        id: String,
        label: &'static str,
    }

    impl Entity for Thing {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn thing(id: &str, label: &'static str) -> Thing {
        Thing { id: id.to_string(), label }
    }

    #[test]
    fn test_new_id_has_prefix() {
        let id = new_id("task");
        assert!(id.starts_with("task-"));
        assert_ne!(id, new_id("task"));
    }

    #[test]
    fn test_replace_and_remove() {
        let mut items = vec![thing("a", "one"), thing("b", "two")];

        assert!(replace_by_id(&mut items, thing("b", "changed")));
        assert!(!replace_by_id(&mut items, thing("c", "missing")));
        assert_eq!(find_by_id(&items, "b").map(|t| t.label), Some("changed"));

        let removed = remove_by_id(&mut items, "a");
        assert_eq!(removed.map(|t| t.label), Some("one"));
        assert_eq!(items.len(), 1);
        assert!(remove_by_id(&mut items, "a").is_none());
    }
}
