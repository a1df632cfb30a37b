use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::patch::Patch;

/// Database model for a category node, with its derived product count
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub name_en: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal projection used for path walks, active or not
#[derive(Debug, Clone, FromRow)]
pub struct CategoryPathNode {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Identity triple used for parent and child references
#[derive(Debug, Clone, FromRow)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            slug: c.slug.clone(),
        }
    }
}

#[cfg(test)]
impl From<&Category> for CategoryPathNode {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            parent_id: c.parent_id,
        }
    }
}

/// Fields written when a category is inserted
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub name_en: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Partial update; only provided fields are written
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub parent_id: Patch<Uuid>,
    pub name_en: Patch<String>,
    pub description: Patch<String>,
    pub image_url: Patch<String>,
    pub meta_title: Patch<String>,
    pub meta_description: Patch<String>,
}

impl CategoryPatch {
    /// Apply the patch to an in-memory copy, mirroring the store's write
    #[cfg(test)]
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(slug) = self.slug {
            category.slug = slug;
        }
        if let Some(sort_order) = self.sort_order {
            category.sort_order = sort_order;
        }
        if let Some(is_active) = self.is_active {
            category.is_active = is_active;
        }
        self.parent_id.apply_to(&mut category.parent_id);
        self.name_en.apply_to(&mut category.name_en);
        self.description.apply_to(&mut category.description);
        self.image_url.apply_to(&mut category.image_url);
        self.meta_title.apply_to(&mut category.meta_title);
        self.meta_description.apply_to(&mut category.meta_description);
        category.updated_at = Utc::now();
    }
}
