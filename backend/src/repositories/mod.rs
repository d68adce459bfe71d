//! Repository layer over the storefront models.
//!
//! The traits describe the catalog and cart stores independently of the
//! backing engine. `Repositories` bundles one implementation of each: the
//! Postgres repositories for deployments, or a shared `MemoryStore` for tests
//! and database-less runs.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{
    Cart, CartItem, Category, NewCategory, NewProduct, Product, ProductChanges, ProductFilter,
    ProductLookup,
};

pub mod cart_repository;
pub mod catalog_repository;
pub mod memory;

pub use cart_repository::PgCartRepository;
pub use catalog_repository::PgCatalogRepository;
pub use memory::MemoryStore;

/// Categories and products.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Create a category, deriving its slug from the name when none is given.
    /// Fails with `DuplicateSlug` when the slug is taken.
    async fn create_category(&self, request: &NewCategory) -> Result<Category, AppError>;

    async fn find_category(&self, id: i64) -> Result<Option<Category>, AppError>;

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError>;

    /// Categories ordered by name.
    async fn list_categories(&self, limit: Option<i64>) -> Result<Vec<Category>, AppError>;

    async fn count_available_products(&self, category_id: i64) -> Result<i64, AppError>;

    async fn create_product(&self, request: &NewProduct) -> Result<Product, AppError>;

    async fn update_product(
        &self,
        id: i64,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, AppError>;

    async fn find_product(
        &self,
        lookup: &ProductLookup,
        must_be_available: bool,
    ) -> Result<Option<Product>, AppError>;

    async fn find_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, AppError>;

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError>;

    /// Number of rows `filter` selects, ignoring its limit and offset.
    async fn count_products(&self, filter: &ProductFilter) -> Result<i64, AppError>;
}

/// Session carts and their items.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Idempotent per session key.
    async fn get_or_create_cart(&self, session_key: &str) -> Result<Cart, AppError>;

    async fn find_cart_by_session(&self, session_key: &str) -> Result<Option<Cart>, AppError>;

    /// Items in insertion order.
    async fn list_items(&self, cart_id: i64) -> Result<Vec<CartItem>, AppError>;

    /// An item, only if it belongs to `cart_id`.
    async fn find_item(&self, cart_id: i64, item_id: i64) -> Result<Option<CartItem>, AppError>;

    /// Atomically create the (cart, product) item or add to its quantity.
    /// Returns `None` without writing when the resulting quantity would exceed
    /// `limit`.
    async fn add_item_quantity(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
        limit: i32,
    ) -> Result<Option<CartItem>, AppError>;

    async fn set_item_quantity(&self, item_id: i64, quantity: i32) -> Result<Option<CartItem>, AppError>;

    async fn delete_item(&self, item_id: i64) -> Result<bool, AppError>;

    /// Remove every item of the cart, keeping the cart itself.
    async fn clear_items(&self, cart_id: i64) -> Result<u64, AppError>;
}

/// Repository container handed to the services.
#[derive(Clone)]
pub struct Repositories {
    pub catalog: Arc<dyn CatalogRepository>,
    pub carts: Arc<dyn CartRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            catalog: Arc::new(PgCatalogRepository::new(pool.clone())),
            carts: Arc::new(PgCartRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            catalog: Arc::new(store.clone()),
            carts: Arc::new(store),
        }
    }
}
