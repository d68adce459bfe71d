use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{Cart, CartItem};
use crate::repositories::CartRepository;

#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn get_or_create_cart(&self, session_key: &str) -> Result<Cart, AppError> {
        Cart::get_or_create(&self.pool, session_key).await
    }

    async fn find_cart_by_session(&self, session_key: &str) -> Result<Option<Cart>, AppError> {
        Cart::find_by_session(&self.pool, session_key).await
    }

    async fn list_items(&self, cart_id: i64) -> Result<Vec<CartItem>, AppError> {
        CartItem::list_for_cart(&self.pool, cart_id).await
    }

    async fn find_item(&self, cart_id: i64, item_id: i64) -> Result<Option<CartItem>, AppError> {
        CartItem::find_in_cart(&self.pool, cart_id, item_id).await
    }

    async fn add_item_quantity(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
        limit: i32,
    ) -> Result<Option<CartItem>, AppError> {
        CartItem::add_quantity(&self.pool, cart_id, product_id, quantity, limit).await
    }

    async fn set_item_quantity(&self, item_id: i64, quantity: i32) -> Result<Option<CartItem>, AppError> {
        CartItem::set_quantity(&self.pool, item_id, quantity).await
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, AppError> {
        CartItem::delete(&self.pool, item_id).await
    }

    async fn clear_items(&self, cart_id: i64) -> Result<u64, AppError> {
        Cart::clear(&self.pool, cart_id).await
    }
}
