use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::CategoryConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryFlatDto, CategoryResponseDto, CategorySummaryDto, CategoryTreeDto,
    CreateCategoryDto, DeleteCategoryResponseDto, UpdateCategoryDto,
};
use crate::features::categories::models::{Category, CategoryPatch, NewCategory};
use crate::features::categories::repositories::CategoryRepository;
use crate::features::categories::services::ancestry_guard::AncestryGuard;
use crate::features::categories::services::path_calculator::PathLookup;
use crate::features::categories::services::tree_assembler::build_forest;
use crate::shared::patch::Patch;

/// Service for category hierarchy reads and mutations.
///
/// Holds no state between calls; every read is a point-in-time snapshot of
/// the store and every mutation validates before it writes.
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
    config: CategoryConfig,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>, config: CategoryConfig) -> Self {
        Self { repository, config }
    }

    /// Active categories as a forest
    pub async fn get_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.repository.find_active_ordered().await?;
        Ok(build_forest(categories, self.config.orphan_policy))
    }

    /// Active categories with depth and full path, sorted by full path
    pub async fn get_flat_list(&self) -> Result<Vec<CategoryFlatDto>> {
        let categories = self.repository.find_active_ordered().await?;
        let lookup = PathLookup::new(
            self.repository.find_all_ordered_minimal().await?,
            self.config.max_path_depth,
        );

        let mut rows: Vec<CategoryFlatDto> = categories
            .into_iter()
            .map(|c| {
                // A row inserted between the two reads resolves as a lone root
                let (depth, full_path) = match lookup.resolve(c.id) {
                    Some(path) => (path.depth, path.full_path),
                    None => (0, c.name.clone()),
                };
                CategoryFlatDto {
                    id: c.id,
                    name: c.name,
                    slug: c.slug,
                    parent_id: c.parent_id,
                    depth,
                    full_path,
                }
            })
            .collect();

        rows.sort_by(|a, b| a.full_path.cmp(&b.full_path).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    /// Get an active category by slug with its parent and active children
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryDetailDto> {
        let category = self
            .repository
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))?;

        self.detail(category).await
    }

    /// Get any category (active or not) by id with its parent and active children
    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryDetailDto> {
        let category = self.load(id).await?;
        self.detail(category).await
    }

    /// Create a category after checking slug uniqueness and parent existence
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        self.ensure_slug_available(&dto.slug, None).await?;

        let parent = match dto.parent_id {
            Some(parent_id) => Some(self.load_parent(parent_id).await?),
            None => None,
        };

        let category = self
            .repository
            .create(NewCategory {
                id: Uuid::now_v7(),
                parent_id: dto.parent_id,
                name: dto.name,
                name_en: dto.name_en,
                slug: dto.slug,
                description: dto.description,
                image_url: dto.image_url,
                meta_title: dto.meta_title,
                meta_description: dto.meta_description,
                sort_order: dto.sort_order,
                is_active: dto.is_active,
            })
            .await?;

        tracing::info!(
            "Category created: id={}, slug={}, parent_id={:?}",
            category.id,
            category.slug,
            category.parent_id
        );

        Ok(CategoryResponseDto::new(
            category,
            parent.as_ref().map(CategorySummaryDto::from),
        ))
    }

    /// Apply a partial update.
    ///
    /// Slug changes are re-checked for uniqueness. Parent changes reject
    /// self-parenting, a missing parent, and any move under the category's own
    /// subtree.
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let current = self.load(id).await?;

        if let Some(slug) = dto.slug.as_deref() {
            if slug != current.slug {
                self.ensure_slug_available(slug, Some(id)).await?;
            }
        }

        if let Patch::Value(new_parent_id) = dto.parent_id {
            if new_parent_id == id {
                return Err(AppError::InvalidOperation(
                    "A category cannot be its own parent".to_string(),
                ));
            }

            if current.parent_id != Some(new_parent_id) {
                self.load_parent(new_parent_id).await?;

                let guard = AncestryGuard::new(
                    self.repository.as_ref(),
                    self.config.ancestry_strategy,
                );
                if guard.is_descendant(new_parent_id, id).await? {
                    return Err(AppError::InvalidOperation(
                        "Cannot move a category under one of its own descendants".to_string(),
                    ));
                }
            }
        }

        let updated = self
            .repository
            .update(id, CategoryPatch::from(dto))
            .await?;

        tracing::info!(
            "Category updated: id={}, slug={}, parent_id={:?}",
            updated.id,
            updated.slug,
            updated.parent_id
        );

        let parent = self.parent_summary(updated.parent_id).await?;
        Ok(CategoryResponseDto::new(updated, parent))
    }

    /// Delete a category, moving its direct children up to its own parent.
    ///
    /// Rejected while products are attached. Children are reparented first;
    /// if that fails the category is left in place.
    pub async fn delete(&self, id: Uuid) -> Result<DeleteCategoryResponseDto> {
        let category = self.load(id).await?;
        let product_count = self.repository.count_products(id).await?;
        let child_count = self.repository.count_children(id).await?;

        if product_count > 0 {
            return Err(AppError::InvalidOperation(format!(
                "Cannot delete category '{}' because it has {} product(s) attached",
                category.slug, product_count
            )));
        }

        let reassigned_children = if child_count > 0 {
            self.repository
                .bulk_reparent(id, category.parent_id)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Aborting delete of category {}: reparenting children failed: {}",
                        id,
                        e
                    );
                    e
                })?
        } else {
            0
        };

        self.repository.delete(id).await?;

        tracing::info!(
            "Category deleted: id={}, slug={}, reassigned_children={}",
            id,
            category.slug,
            reassigned_children
        );

        let message = if reassigned_children > 0 {
            let destination = match category.parent_id {
                Some(_) => "its parent category",
                None => "the root level",
            };
            format!(
                "Category deleted successfully; {} child categor{} moved to {}",
                reassigned_children,
                if reassigned_children == 1 { "y" } else { "ies" },
                destination
            )
        } else {
            "Category deleted successfully".to_string()
        };

        Ok(DeleteCategoryResponseDto {
            message,
            reassigned_children,
        })
    }

    async fn load(&self, id: Uuid) -> Result<Category> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    async fn load_parent(&self, parent_id: Uuid) -> Result<Category> {
        self.repository
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Parent category with id {} not found", parent_id))
            })
    }

    async fn ensure_slug_available(&self, slug: &str, owner: Option<Uuid>) -> Result<()> {
        match self.repository.find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::Conflict(format!(
                "Category with slug '{}' already exists",
                slug
            ))),
            _ => Ok(()),
        }
    }

    async fn parent_summary(&self, parent_id: Option<Uuid>) -> Result<Option<CategorySummaryDto>> {
        let Some(parent_id) = parent_id else {
            return Ok(None);
        };
        Ok(self
            .repository
            .find_by_id(parent_id)
            .await?
            .as_ref()
            .map(CategorySummaryDto::from))
    }

    async fn detail(&self, category: Category) -> Result<CategoryDetailDto> {
        let parent = self.parent_summary(category.parent_id).await?;
        let children = self
            .repository
            .find_active_children(category.id)
            .await?
            .into_iter()
            .map(CategorySummaryDto::from)
            .collect();

        Ok(CategoryDetailDto {
            category: CategoryResponseDto::new(category, parent),
            children,
        })
    }
}
