//! In-memory category store for service and handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{
    Category, CategoryPatch, CategoryPathNode, CategorySummary, NewCategory,
};
use crate::features::categories::repositories::CategoryRepository;

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: Mutex<Vec<Category>>,
    products: Mutex<HashMap<Uuid, i64>>,
    fail_bulk_reparent: AtomicBool,
    find_children_calls: AtomicUsize,
    reverse_alternate_reads: AtomicBool,
    reads: AtomicUsize,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category directly, bypassing the service
    pub fn insert(&self, name: &str, slug: &str, parent_id: Option<Uuid>) -> Uuid {
        let id = Uuid::now_v7();
        let now = Utc::now();
        self.categories.lock().unwrap().push(Category {
            id,
            parent_id,
            name: name.to_string(),
            name_en: None,
            slug: slug.to_string(),
            description: None,
            image_url: None,
            meta_title: None,
            meta_description: None,
            sort_order: 0,
            is_active: true,
            product_count: 0,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn set_active(&self, id: Uuid, is_active: bool) {
        self.modify(id, |c| c.is_active = is_active);
    }

    pub fn set_sort_order(&self, id: Uuid, sort_order: i32) {
        self.modify(id, |c| c.sort_order = sort_order);
    }

    /// Overwrite a parent reference without any checks (for corrupt-data tests)
    pub fn force_parent(&self, id: Uuid, parent_id: Option<Uuid>) {
        self.modify(id, |c| c.parent_id = parent_id);
    }

    pub fn set_product_count(&self, id: Uuid, count: i64) {
        self.products.lock().unwrap().insert(id, count);
    }

    /// Make the next `bulk_reparent` calls fail with an infrastructure error
    pub fn fail_bulk_reparent(&self) {
        self.fail_bulk_reparent.store(true, Ordering::SeqCst);
    }

    /// Return every other ordered read back to front. Rows that tie on
    /// every ORDER BY key have no guaranteed order in PostgreSQL either.
    pub fn reverse_alternate_reads(&self) {
        self.reverse_alternate_reads.store(true, Ordering::SeqCst);
    }

    pub fn find_children_calls(&self) -> usize {
        self.find_children_calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: Uuid) -> Option<Category> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(|c| self.with_product_count(c))
    }

    pub fn len(&self) -> usize {
        self.categories.lock().unwrap().len()
    }

    fn modify(&self, id: Uuid, f: impl FnOnce(&mut Category)) {
        let mut categories = self.categories.lock().unwrap();
        if let Some(category) = categories.iter_mut().find(|c| c.id == id) {
            f(category);
        }
    }

    fn with_product_count(&self, mut category: Category) -> Category {
        category.product_count = self
            .products
            .lock()
            .unwrap()
            .get(&category.id)
            .copied()
            .unwrap_or(0);
        category
    }

    fn ordered(&self) -> Vec<Category> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        if self.reverse_alternate_reads.load(Ordering::SeqCst)
            && self.reads.fetch_add(1, Ordering::SeqCst) % 2 == 1
        {
            categories.reverse();
        }
        categories
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_active_ordered(&self) -> Result<Vec<Category>> {
        Ok(self
            .ordered()
            .into_iter()
            .filter(|c| c.is_active)
            .map(|c| self.with_product_count(c))
            .collect())
    }

    async fn find_all_ordered_minimal(&self) -> Result<Vec<CategoryPathNode>> {
        Ok(self.ordered().iter().map(CategoryPathNode::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.get(id))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let found = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned();
        Ok(found.map(|c| self.with_product_count(c)))
    }

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Uuid>> {
        self.find_children_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .map(|c| c.id)
            .collect())
    }

    async fn find_active_children(&self, parent_id: Uuid) -> Result<Vec<CategorySummary>> {
        Ok(self
            .ordered()
            .iter()
            .filter(|c| c.is_active && c.parent_id == Some(parent_id))
            .map(CategorySummary::from)
            .collect())
    }

    async fn create(&self, fields: NewCategory) -> Result<Category> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.slug == fields.slug) {
            return Err(AppError::Conflict(
                "A category with this slug already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let category = Category {
            id: fields.id,
            parent_id: fields.parent_id,
            name: fields.name,
            name_en: fields.name_en,
            slug: fields.slug,
            description: fields.description,
            image_url: fields.image_url,
            meta_title: fields.meta_title,
            meta_description: fields.meta_description,
            sort_order: fields.sort_order,
            is_active: fields.is_active,
            product_count: 0,
            created_at: now,
            updated_at: now,
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category> {
        let updated = {
            let mut categories = self.categories.lock().unwrap();
            if let Some(slug) = &patch.slug {
                if categories.iter().any(|c| &c.slug == slug && c.id != id) {
                    return Err(AppError::Conflict(
                        "A category with this slug already exists".to_string(),
                    ));
                }
            }
            let category = categories
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;
            patch.apply(category);
            category.clone()
        };
        Ok(self.with_product_count(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }
        Ok(())
    }

    async fn bulk_reparent(
        &self,
        old_parent_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> Result<u64> {
        if self.fail_bulk_reparent.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut moved = 0;
        for category in self.categories.lock().unwrap().iter_mut() {
            if category.parent_id == Some(old_parent_id) {
                category.parent_id = new_parent_id;
                category.updated_at = Utc::now();
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn count_products(&self, id: Uuid) -> Result<i64> {
        Ok(self.products.lock().unwrap().get(&id).copied().unwrap_or(0))
    }

    async fn count_children(&self, id: Uuid) -> Result<i64> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.parent_id == Some(id))
            .count() as i64)
    }
}
