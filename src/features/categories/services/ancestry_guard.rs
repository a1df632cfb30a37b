//! Cycle check for reparenting: is `candidate` somewhere below `ancestor`?
//!
//! Only used to gate writes, never on read paths.

use std::collections::{HashMap, HashSet, VecDeque};
use std::str::FromStr;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::repositories::CategoryRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AncestryStrategy {
    /// Breadth-first over `find_children`, one store call per visited node
    #[default]
    Worklist,
    /// One bulk read of every `(id, parent_id)`, then an in-memory walk
    Snapshot,
}

impl FromStr for AncestryStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "worklist" => Ok(AncestryStrategy::Worklist),
            "snapshot" => Ok(AncestryStrategy::Snapshot),
            other => Err(format!(
                "CATEGORY_ANCESTRY_STRATEGY must be 'worklist' or 'snapshot', got '{}'",
                other
            )),
        }
    }
}

pub struct AncestryGuard<'a> {
    repository: &'a dyn CategoryRepository,
    strategy: AncestryStrategy,
}

impl<'a> AncestryGuard<'a> {
    pub fn new(repository: &'a dyn CategoryRepository, strategy: AncestryStrategy) -> Self {
        Self {
            repository,
            strategy,
        }
    }

    /// True iff `candidate_id` is reachable by following child links from `ancestor_id`.
    ///
    /// A node is not its own descendant; callers reject self-parenting separately.
    pub async fn is_descendant(&self, candidate_id: Uuid, ancestor_id: Uuid) -> Result<bool> {
        if candidate_id == ancestor_id {
            return Ok(false);
        }

        match self.strategy {
            AncestryStrategy::Worklist => self.search_down(candidate_id, ancestor_id).await,
            AncestryStrategy::Snapshot => self.walk_up(candidate_id, ancestor_id).await,
        }
    }

    async fn search_down(&self, candidate_id: Uuid, ancestor_id: Uuid) -> Result<bool> {
        let mut queue = VecDeque::from([ancestor_id]);
        let mut visited = HashSet::from([ancestor_id]);

        while let Some(current) = queue.pop_front() {
            for child in self.repository.find_children(current).await? {
                if child == candidate_id {
                    return Ok(true);
                }
                // Corrupt cycles below the ancestor must not spin forever
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        Ok(false)
    }

    async fn walk_up(&self, candidate_id: Uuid, ancestor_id: Uuid) -> Result<bool> {
        let parents: HashMap<Uuid, Option<Uuid>> = self
            .repository
            .find_all_ordered_minimal()
            .await?
            .into_iter()
            .map(|n| (n.id, n.parent_id))
            .collect();

        Ok(has_ancestor(&parents, candidate_id, ancestor_id))
    }
}

/// Follow parent links from `candidate_id` looking for `ancestor_id`
fn has_ancestor(
    parents: &HashMap<Uuid, Option<Uuid>>,
    candidate_id: Uuid,
    ancestor_id: Uuid,
) -> bool {
    let mut seen = HashSet::from([candidate_id]);
    let mut current = parents.get(&candidate_id).copied().flatten();

    while let Some(id) = current {
        if id == ancestor_id {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        current = parents.get(&id).copied().flatten();
    }

    false
}
