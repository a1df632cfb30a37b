use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryPatch, CategorySummary};
use crate::shared::constants::{
    MAX_META_DESCRIPTION_LENGTH, MAX_META_TITLE_LENGTH, MAX_NAME_LENGTH,
};
use crate::shared::patch::Patch;
use crate::shared::validation::SLUG_REGEX;

/// Parent or child reference embedded in category responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<CategorySummary> for CategorySummaryDto {
    fn from(s: CategorySummary) -> Self {
        Self {
            id: s.id,
            name: s.name,
            slug: s.slug,
        }
    }
}

impl From<&Category> for CategorySummaryDto {
    fn from(c: &Category) -> Self {
        CategorySummary::from(c).into()
    }
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
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
    /// Number of products attached to this category (read-only)
    pub product_count: i64,
    pub parent: Option<CategorySummaryDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryResponseDto {
    pub fn new(c: Category, parent: Option<CategorySummaryDto>) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            name_en: c.name_en,
            slug: c.slug,
            description: c.description,
            image_url: c.image_url,
            meta_title: c.meta_title,
            meta_description: c.meta_description,
            sort_order: c.sort_order,
            is_active: c.is_active,
            product_count: c.product_count,
            parent,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Category with its parent summary and active direct children
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub children: Vec<CategorySummaryDto>,
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub name_en: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub product_count: i64,
    pub children: Vec<CategoryTreeDto>,
}

impl From<Category> for CategoryTreeDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            name_en: c.name_en,
            slug: c.slug,
            description: c.description,
            image_url: c.image_url,
            sort_order: c.sort_order,
            product_count: c.product_count,
            children: Vec::new(),
        }
    }
}

/// Flat listing row annotated with depth (root = 0) and "A > B > C" path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryFlatDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
    pub depth: usize,
    pub full_path: String,
}

/// Public listing: nested forest or flat path-annotated rows
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryListingDto {
    Tree(Vec<CategoryTreeDto>),
    Flat(Vec<CategoryFlatDto>),
}

impl CategoryListingDto {
    pub fn len(&self) -> usize {
        match self {
            CategoryListingDto::Tree(roots) => roots.len(),
            CategoryListingDto::Flat(rows) => rows.len(),
        }
    }
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub name_en: Option<String>,

    /// Lowercase alphanumeric segments joined by hyphens, e.g. "mens-clothing"
    #[validate(
        length(min = 1, max = 100),
        regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumeric words separated by single hyphens (e.g. 'mens-clothing')")
    )]
    pub slug: String,

    pub parent_id: Option<Uuid>,

    pub description: Option<String>,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(length(max = 70))]
    pub meta_title: Option<String>,

    #[validate(length(max = 160))]
    pub meta_description: Option<String>,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

/// Request DTO for partially updating a category.
///
/// Omitted fields are left untouched. Nullable fields accept `null` to clear
/// them; `"parent_id": null` moves the category to the root level.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(
        length(min = 1, max = 100),
        regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumeric words separated by single hyphens (e.g. 'mens-clothing')")
    )]
    pub slug: Option<String>,

    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,

    #[serde(default)]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Patch<Uuid>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name_en: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_url: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub meta_title: Patch<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub meta_description: Patch<String>,
}

impl UpdateCategoryDto {
    /// Length checks for the tri-state fields, which the derive does not reach
    pub fn validate_patch_fields(&self) -> std::result::Result<(), String> {
        check_patch_length("name_en", &self.name_en, 1, MAX_NAME_LENGTH)?;
        check_patch_length("meta_title", &self.meta_title, 0, MAX_META_TITLE_LENGTH)?;
        check_patch_length(
            "meta_description",
            &self.meta_description,
            0,
            MAX_META_DESCRIPTION_LENGTH,
        )
    }
}

fn check_patch_length(
    field: &str,
    patch: &Patch<String>,
    min: usize,
    max: usize,
) -> std::result::Result<(), String> {
    match patch.as_value().map(|v| v.chars().count()) {
        Some(len) if len < min || len > max => Err(format!(
            "{}: length must be between {} and {}",
            field, min, max
        )),
        _ => Ok(()),
    }
}

impl From<UpdateCategoryDto> for CategoryPatch {
    fn from(dto: UpdateCategoryDto) -> Self {
        Self {
            name: dto.name,
            slug: dto.slug,
            sort_order: dto.sort_order,
            is_active: dto.is_active,
            parent_id: dto.parent_id,
            name_en: dto.name_en,
            description: dto.description,
            image_url: dto.image_url,
            meta_title: dto.meta_title,
            meta_description: dto.meta_description,
        }
    }
}

/// Result of a delete, reporting how many children moved up a level
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteCategoryResponseDto {
    pub message: String,
    pub reassigned_children: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_defaults() {
        let dto: CreateCategoryDto =
            serde_json::from_str(r#"{"name": "Shoes", "slug": "shoes"}"#).unwrap();
        assert!(dto.is_active);
        assert_eq!(dto.sort_order, 0);
        assert!(dto.parent_id.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_dto_rejects_bad_slug() {
        let dto: CreateCategoryDto =
            serde_json::from_str(r#"{"name": "Shoes", "slug": "Mens--Shoes"}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_distinguishes_null_from_missing() {
        let dto: UpdateCategoryDto =
            serde_json::from_str(r#"{"parent_id": null, "name": "Boots"}"#).unwrap();
        assert_eq!(dto.parent_id, Patch::Null);
        assert_eq!(dto.description, Patch::Absent);
        assert_eq!(dto.name.as_deref(), Some("Boots"));
    }

    #[test]
    fn test_update_dto_validates_patch_lengths() {
        let long_title = "x".repeat(MAX_META_TITLE_LENGTH + 1);
        let dto = UpdateCategoryDto {
            meta_title: Patch::Value(long_title),
            ..Default::default()
        };
        assert!(dto.validate_patch_fields().is_err());

        let cleared = UpdateCategoryDto {
            meta_title: Patch::Null,
            name_en: Patch::Value("Shoes".to_string()),
            ..Default::default()
        };
        assert!(cleared.validate_patch_fields().is_ok());
        assert!(cleared.validate().is_ok());
    }
}
