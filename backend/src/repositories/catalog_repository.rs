use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{
    Category, NewCategory, NewProduct, Product, ProductChanges, ProductFilter, ProductLookup,
};
use crate::repositories::CatalogRepository;

#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn create_category(&self, request: &NewCategory) -> Result<Category, AppError> {
        Category::create(&self.pool, request).await
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        Category::find_by_id(&self.pool, id).await
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        Category::find_by_slug(&self.pool, slug).await
    }

    async fn list_categories(&self, limit: Option<i64>) -> Result<Vec<Category>, AppError> {
        Category::list(&self.pool, limit).await
    }

    async fn count_available_products(&self, category_id: i64) -> Result<i64, AppError> {
        Category::count_available_products(&self.pool, category_id).await
    }

    async fn create_product(&self, request: &NewProduct) -> Result<Product, AppError> {
        Product::create(&self.pool, request).await
    }

    async fn update_product(
        &self,
        id: i64,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, AppError> {
        Product::update(&self.pool, id, changes).await
    }

    async fn find_product(
        &self,
        lookup: &ProductLookup,
        must_be_available: bool,
    ) -> Result<Option<Product>, AppError> {
        Product::find(&self.pool, lookup, must_be_available).await
    }

    async fn find_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Product::find_by_ids(&self.pool, ids).await
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        Product::search(&self.pool, filter).await
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<i64, AppError> {
        Product::count(&self.pool, filter).await
    }
}
