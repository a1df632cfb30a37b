//! Storage port for the category table.
//!
//! The hierarchy engine only talks to the store through this trait, so the
//! PostgreSQL adapter and the in-memory test double are interchangeable.
//! Every method is a single store interaction; sequencing and validation live
//! in `CategoryService`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::{
    Category, CategoryPatch, CategoryPathNode, CategorySummary, NewCategory,
};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Active categories ordered by `sort_order`, then `name`
    async fn find_active_ordered(&self) -> Result<Vec<Category>>;

    /// Every category (active or not) as `{id, name, parent_id}`, same ordering
    async fn find_all_ordered_minimal(&self) -> Result<Vec<CategoryPathNode>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// Ids of the direct children of `parent_id`, active or not
    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Uuid>>;

    /// Active direct children of `parent_id`, ordered by `sort_order`, then `name`
    async fn find_active_children(&self, parent_id: Uuid) -> Result<Vec<CategorySummary>>;

    async fn create(&self, fields: NewCategory) -> Result<Category>;

    /// Write the provided fields; `NotFound` if the row disappeared
    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Point every direct child of `old_parent_id` at `new_parent_id`; returns rows moved
    async fn bulk_reparent(&self, old_parent_id: Uuid, new_parent_id: Option<Uuid>)
        -> Result<u64>;

    async fn count_products(&self, id: Uuid) -> Result<i64>;

    async fn count_children(&self, id: Uuid) -> Result<i64>;
}
