use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use storefront_shared::CategoryResponse;
use validator::Validate;
use crate::error::AppError;
use crate::utils::slugify;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub image: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            image: None,
        }
    }

    /// The slug to store: the caller's slug if given, otherwise one derived
    /// from the name.
    pub fn resolved_slug(&self) -> Result<String, AppError> {
        resolve_slug(self.slug.as_deref(), &self.name)
    }
}

/// Shared slug rule for categories and products.
pub(crate) fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, AppError> {
    let slug = match explicit.map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => slugify(name),
    };

    if slug.is_empty() {
        return Err(AppError::Validation(format!(
            "Cannot derive a slug from name '{}'",
            name
        )));
    }

    Ok(slug)
}

impl Category {
    pub async fn create(pool: &PgPool, request: &NewCategory) -> Result<Self, AppError> {
        let slug = request.resolved_slug()?;

        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, image)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, image, created, updated
            "#,
        )
        .bind(&request.name)
        .bind(&slug)
        .bind(&request.image)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::from_slug_write(e, &slug))
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, image, created, updated FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, image, created, updated FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Categories ordered by name, optionally capped.
    pub async fn list(pool: &PgPool, limit: Option<i64>) -> Result<Vec<Self>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, image, created, updated
            FROM categories
            ORDER BY name, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Number of available products in the category, computed on every call.
    pub async fn count_available_products(pool: &PgPool, id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category_id = $1 AND available = TRUE",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    pub fn url(&self) -> String {
        format!("/category/{}/", self.slug)
    }

    pub fn to_response(&self, product_count: i64) -> CategoryResponse {
        CategoryResponse {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            image: self.image.clone(),
            url: self.url(),
            product_count,
            created: self.created,
            updated: self.updated,
        }
    }
}
