//! Depth and display path for a single category.

use std::collections::HashMap;

use uuid::Uuid;

use crate::features::categories::models::CategoryPathNode;
use crate::shared::constants::PATH_SEPARATOR;

/// Depth (root = 0) and "Root > ... > Self" path of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPath {
    pub depth: usize,
    pub full_path: String,
}

/// id → (name, parent) lookup over every category, active or not.
///
/// Built fresh for each listing call.
pub struct PathLookup {
    nodes: HashMap<Uuid, CategoryPathNode>,
    max_depth: usize,
}

impl PathLookup {
    pub fn new(nodes: Vec<CategoryPathNode>, max_depth: usize) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
            max_depth,
        }
    }

    /// Walk parent references upward from `id`.
    ///
    /// Stops at a root, at a parent missing from the lookup, or after
    /// `max_depth` hops. Hitting the hop ceiling means the stored data is
    /// cyclic or absurdly deep; the path is truncated and a warning logged.
    /// Returns `None` only when `id` itself is unknown.
    pub fn resolve(&self, id: Uuid) -> Option<CategoryPath> {
        let node = self.nodes.get(&id)?;

        let mut names: Vec<&str> = vec![node.name.as_str()];
        let mut current = node.parent_id;

        while let Some(parent_id) = current {
            let Some(parent) = self.nodes.get(&parent_id) else {
                break;
            };
            if names.len() > self.max_depth {
                tracing::warn!(
                    category_id = %id,
                    max_depth = self.max_depth,
                    "Category ancestry exceeds hop ceiling, truncating path (possible cycle)"
                );
                break;
            }
            names.push(parent.name.as_str());
            current = parent.parent_id;
        }

        let depth = names.len() - 1;
        names.reverse();

        Some(CategoryPath {
            depth,
            full_path: names.join(PATH_SEPARATOR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, parent_id: Option<Uuid>) -> CategoryPathNode {
        CategoryPathNode {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id,
        }
    }

    #[test]
    fn test_root_has_depth_zero() {
        let root = node("Clothing", None);
        let id = root.id;
        let lookup = PathLookup::new(vec![root], 20);

        let path = lookup.resolve(id).unwrap();
        assert_eq!(path.depth, 0);
        assert_eq!(path.full_path, "Clothing");
    }

    #[test]
    fn test_three_levels() {
        let a = node("A", None);
        let b = node("B", Some(a.id));
        let c = node("C", Some(b.id));
        let (a_id, b_id, c_id) = (a.id, b.id, c.id);
        let lookup = PathLookup::new(vec![c, a, b], 20);

        let path = lookup.resolve(c_id).unwrap();
        assert_eq!(path.depth, 2);
        assert_eq!(path.full_path, "A > B > C");

        // depth(N) == 1 + depth(parent(N))
        let b_depth = lookup.resolve(b_id).unwrap().depth;
        let a_depth = lookup.resolve(a_id).unwrap().depth;
        assert_eq!(path.depth, b_depth + 1);
        assert_eq!(b_depth, a_depth + 1);
    }

    #[test]
    fn test_missing_parent_truncates() {
        let orphan = node("Orphan", Some(Uuid::new_v4()));
        let id = orphan.id;
        let lookup = PathLookup::new(vec![orphan], 20);

        let path = lookup.resolve(id).unwrap();
        assert_eq!(path.depth, 0);
        assert_eq!(path.full_path, "Orphan");
    }

    #[test]
    fn test_unknown_id() {
        let lookup = PathLookup::new(Vec::new(), 20);
        assert!(lookup.resolve(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_cycle_stops_at_ceiling() {
        let mut a = node("A", None);
        let b = node("B", Some(a.id));
        a.parent_id = Some(b.id);
        let a_id = a.id;
        let lookup = PathLookup::new(vec![a, b], 20);

        let path = lookup.resolve(a_id).unwrap();
        assert_eq!(path.depth, 20);
        assert!(path.full_path.ends_with("B > A"));
    }

    #[test]
    fn test_self_parent_stops_at_ceiling() {
        let mut a = node("A", None);
        a.parent_id = Some(a.id);
        let a_id = a.id;
        let lookup = PathLookup::new(vec![a], 5);

        let path = lookup.resolve(a_id).unwrap();
        assert_eq!(path.depth, 5);
    }
}
