use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{
    Category, CategoryPatch, CategoryPathNode, CategorySummary, NewCategory,
};
use crate::features::categories::repositories::CategoryRepository;
use crate::shared::patch::Patch;

/// Column list for `Category`, expects the table aliased as `c`
const CATEGORY_COLUMNS: &str = r#"
    c.id, c.parent_id, c.name, c.name_en, c.slug, c.description, c.image_url,
    c.meta_title, c.meta_description, c.sort_order, c.is_active,
    (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count,
    c.created_at, c.updated_at
"#;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map constraint violations raised by writes onto the engine's error taxonomy.
///
/// The application checks run first and give the clearer message; these cover
/// the window between check and write.
fn handle_write_error(e: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return AppError::Conflict("A category with this slug already exists".to_string());
            }
            Some(FOREIGN_KEY_VIOLATION) if operation == "delete" => {
                return AppError::InvalidOperation(
                    "Category is still referenced and cannot be deleted".to_string(),
                );
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::NotFound("Parent category does not exist".to_string());
            }
            _ => {}
        }
    }

    tracing::error!("Failed to {} category: {:?}", operation, e);
    AppError::Database(e)
}

fn handle_read_error(e: sqlx::Error, operation: &str) -> AppError {
    tracing::error!("Failed to {}: {:?}", operation, e);
    AppError::Database(e)
}

/// PostgreSQL-backed category store
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append `, column = $n` for a nullable column when the patch touches it
fn push_patch<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, patch: Patch<T>)
where
    T: 'a + Send + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres>,
{
    match patch {
        Patch::Absent => {}
        Patch::Null => {
            qb.push(format!(", {} = NULL", column));
        }
        Patch::Value(value) => {
            qb.push(format!(", {} = ", column));
            qb.push_bind(value);
        }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_active_ordered(&self) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories c WHERE c.is_active = TRUE ORDER BY c.sort_order, c.name, c.id",
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_read_error(e, "list active categories"))
    }

    async fn find_all_ordered_minimal(&self) -> Result<Vec<CategoryPathNode>> {
        sqlx::query_as::<_, CategoryPathNode>(
            r#"
            SELECT id, name, parent_id
            FROM categories
            ORDER BY sort_order, name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| handle_read_error(e, "list category path nodes"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {} FROM categories c WHERE c.id = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_read_error(e, "get category by id"))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let query = format!(
            "SELECT {} FROM categories c WHERE c.slug = $1",
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_read_error(e, "get category by slug"))
    }

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM categories WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_read_error(e, "list child category ids"))
    }

    async fn find_active_children(&self, parent_id: Uuid) -> Result<Vec<CategorySummary>> {
        sqlx::query_as::<_, CategorySummary>(
            r#"
            SELECT id, name, slug
            FROM categories
            WHERE parent_id = $1 AND is_active = TRUE
            ORDER BY sort_order, name, id
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| handle_read_error(e, "list active child categories"))
    }

    async fn create(&self, fields: NewCategory) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (
                id, parent_id, name, name_en, slug, description, image_url,
                meta_title, meta_description, sort_order, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, parent_id, name, name_en, slug, description, image_url,
                      meta_title, meta_description, sort_order, is_active,
                      0::BIGINT AS product_count, created_at, updated_at
            "#,
        )
        .bind(fields.id)
        .bind(fields.parent_id)
        .bind(fields.name)
        .bind(fields.name_en)
        .bind(fields.slug)
        .bind(fields.description)
        .bind(fields.image_url)
        .bind(fields.meta_title)
        .bind(fields.meta_description)
        .bind(fields.sort_order)
        .bind(fields.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "create"))
    }

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE categories c SET updated_at = NOW()");

        if let Some(name) = patch.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(slug) = patch.slug {
            qb.push(", slug = ").push_bind(slug);
        }
        if let Some(sort_order) = patch.sort_order {
            qb.push(", sort_order = ").push_bind(sort_order);
        }
        if let Some(is_active) = patch.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }
        push_patch(&mut qb, "parent_id", patch.parent_id);
        push_patch(&mut qb, "name_en", patch.name_en);
        push_patch(&mut qb, "description", patch.description);
        push_patch(&mut qb, "image_url", patch.image_url);
        push_patch(&mut qb, "meta_title", patch.meta_title);
        push_patch(&mut qb, "meta_description", patch.meta_description);

        qb.push(" WHERE c.id = ").push_bind(id);
        qb.push(" RETURNING ").push(CATEGORY_COLUMNS);

        qb.build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_write_error(e, "update"))?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_write_error(e, "delete"))?;

        if result.rows_affected() == 0 {
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
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET parent_id = $2, updated_at = NOW()
            WHERE parent_id = $1
            "#,
        )
        .bind(old_parent_id)
        .bind(new_parent_id)
        .execute(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "reparent children of"))?;

        Ok(result.rows_affected())
    }

    async fn count_products(&self, id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_read_error(e, "count category products"))
    }

    async fn count_children(&self, id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_read_error(e, "count child categories"))
    }
}
