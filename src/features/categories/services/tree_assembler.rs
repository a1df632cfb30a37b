//! Builds a navigable forest from the flat, ordered list of active categories.

use std::collections::HashMap;
use std::str::FromStr;

use uuid::Uuid;

use crate::features::categories::dtos::CategoryTreeDto;
use crate::features::categories::models::Category;

/// What happens to a node whose parent is not part of the input set
/// (typically because the parent is deactivated).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Surface the node (and its subtree) as an additional root
    #[default]
    PromoteToRoot,
    /// Drop the node and its subtree from the forest
    Exclude,
}

impl FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "promote" | "promote_to_root" => Ok(OrphanPolicy::PromoteToRoot),
            "exclude" => Ok(OrphanPolicy::Exclude),
            other => Err(format!(
                "CATEGORY_ORPHAN_POLICY must be 'promote' or 'exclude', got '{}'",
                other
            )),
        }
    }
}

/// Assemble a forest from categories already sorted by `sort_order`, then `name`.
///
/// Children keep the relative order they had in the input. Runs in O(n): one
/// pass indexes the nodes, a second links each node under its parent or
/// records it as a root. Nodes caught in a parent cycle never hang off a root
/// and are left out.
pub fn build_forest(categories: Vec<Category>, policy: OrphanPolicy) -> Vec<CategoryTreeDto> {
    let index: HashMap<Uuid, usize> = categories
        .iter()
        .enumerate()
        .map(|(position, c)| (c.id, position))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (position, category) in categories.iter().enumerate() {
        match category.parent_id {
            None => roots.push(position),
            Some(parent_id) => match index.get(&parent_id) {
                Some(&parent) => children[parent].push(position),
                None if policy == OrphanPolicy::PromoteToRoot => roots.push(position),
                None => {
                    tracing::debug!(
                        category_id = %category.id,
                        parent_id = %parent_id,
                        "Excluding category whose parent is not in the active set"
                    );
                }
            },
        }
    }

    let mut slots: Vec<Option<Category>> = categories.into_iter().map(Some).collect();

    roots
        .into_iter()
        .filter_map(|root| materialize(root, &children, &mut slots))
        .collect()
}

/// Move the node at `position` out of `slots` and attach its subtree.
/// Each slot is taken at most once, so every node appears at most once.
fn materialize(
    position: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<Category>],
) -> Option<CategoryTreeDto> {
    let category = slots[position].take()?;
    let mut node = CategoryTreeDto::from(category);

    node.children = children[position]
        .iter()
        .filter_map(|&child| materialize(child, children, slots))
        .collect();

    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    fn category(name: &str, parent_id: Option<Uuid>) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::new_v4(),
            parent_id,
            name: name.to_string(),
            name_en: None,
            slug: name.to_lowercase(),
            description: None,
            image_url: None,
            meta_title: None,
            meta_description: None,
            sort_order: 0,
            is_active: true,
            product_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn flatten(nodes: &[CategoryTreeDto], out: &mut Vec<Uuid>) {
        for node in nodes {
            out.push(node.id);
            flatten(&node.children, out);
        }
    }

    #[test]
    fn test_builds_nested_tree() {
        let a = category("A", None);
        let b = category("B", Some(a.id));
        let c = category("C", Some(b.id));
        let (a_id, b_id, c_id) = (a.id, b.id, c.id);

        let forest = build_forest(vec![a, b, c], OrphanPolicy::PromoteToRoot);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, a_id);
        assert_eq!(forest[0].children[0].id, b_id);
        assert_eq!(forest[0].children[0].children[0].id, c_id);
    }

    #[test]
    fn test_children_keep_input_order() {
        let root = category("Root", None);
        let first = category("Zeta", Some(root.id));
        let second = category("Alpha", Some(root.id));
        let expected = vec![first.id, second.id];

        let forest = build_forest(vec![root, first, second], OrphanPolicy::default());

        let ids: Vec<Uuid> = forest[0].children.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_child_listed_before_parent_is_still_nested() {
        let parent = category("Parent", None);
        let child = category("Child", Some(parent.id));
        let parent_id = parent.id;

        let forest = build_forest(vec![child, parent], OrphanPolicy::default());

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, parent_id);
        assert_eq!(forest[0].children.len(), 1);
    }

    #[test]
    fn test_orphan_promoted_to_root() {
        let missing_parent = Uuid::new_v4();
        let orphan = category("Orphan", Some(missing_parent));
        let grandchild = category("Grandchild", Some(orphan.id));
        let orphan_id = orphan.id;

        let forest = build_forest(vec![orphan, grandchild], OrphanPolicy::PromoteToRoot);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, orphan_id);
        assert_eq!(forest[0].children.len(), 1);
    }

    #[test]
    fn test_orphan_excluded_with_subtree() {
        let root = category("Root", None);
        let orphan = category("Orphan", Some(Uuid::new_v4()));
        let grandchild = category("Grandchild", Some(orphan.id));
        let root_id = root.id;

        let forest = build_forest(vec![root, orphan, grandchild], OrphanPolicy::Exclude);

        let mut ids = Vec::new();
        flatten(&forest, &mut ids);
        assert_eq!(ids, vec![root_id]);
    }

    #[test]
    fn test_cyclic_nodes_do_not_loop() {
        let mut a = category("A", None);
        let b = category("B", Some(a.id));
        a.parent_id = Some(b.id);
        let root = category("Root", None);
        let root_id = root.id;

        let forest = build_forest(vec![a, b, root], OrphanPolicy::PromoteToRoot);

        let mut ids = Vec::new();
        flatten(&forest, &mut ids);
        assert_eq!(ids, vec![root_id]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_forest(Vec::new(), OrphanPolicy::default()).is_empty());
    }

    #[test]
    fn test_random_forest_contains_each_node_once() {
        for _ in 0..20 {
            let size: usize = (1usize..60).fake();
            let mut nodes: Vec<Category> = Vec::with_capacity(size);
            for i in 0..size {
                let name: String = Word().fake();
                // Parent is always an earlier node, so the set is cycle-free
                let parent = if i == 0 || (0u8..4).fake::<u8>() == 0 {
                    None
                } else {
                    Some(nodes[(0..i).fake::<usize>()].id)
                };
                nodes.push(category(&name, parent));
            }
            let mut expected: Vec<Uuid> = nodes.iter().map(|c| c.id).collect();

            let forest = build_forest(nodes, OrphanPolicy::PromoteToRoot);

            let mut seen = Vec::new();
            flatten(&forest, &mut seen);
            expected.sort();
            seen.sort();
            assert_eq!(seen, expected);
        }
    }
}
