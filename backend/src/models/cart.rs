use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use storefront_shared::{format_price, CartItemResponse, CartResponse};
use crate::error::AppError;
use crate::models::Product;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Cart {
    pub id: i64,
    pub session_key: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub created: DateTime<Utc>,
}

impl Cart {
    /// Fetch the cart for a session, creating it on first use. A single upsert
    /// on the unique session key, so concurrent calls never produce two rows.
    pub async fn get_or_create(pool: &PgPool, session_key: &str) -> Result<Self, AppError> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (session_key)
            VALUES ($1)
            ON CONFLICT (session_key) DO UPDATE SET session_key = EXCLUDED.session_key
            RETURNING id, session_key, created, updated
            "#,
        )
        .bind(session_key)
        .fetch_one(pool)
        .await?;

        Ok(cart)
    }

    pub async fn find_by_session(pool: &PgPool, session_key: &str) -> Result<Option<Self>, AppError> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, session_key, created, updated FROM carts WHERE session_key = $1",
        )
        .bind(session_key)
        .fetch_optional(pool)
        .await?;

        Ok(cart)
    }

    /// Delete every item in the cart. The cart row stays.
    pub async fn clear(pool: &PgPool, cart_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

impl CartItem {
    /// Items of a cart in insertion order.
    pub async fn list_for_cart(pool: &PgPool, cart_id: i64) -> Result<Vec<Self>, AppError> {
        let items = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, product_id, quantity, created
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY created, id
            "#,
        )
        .bind(cart_id)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    pub async fn find_in_cart(pool: &PgPool, cart_id: i64, item_id: i64) -> Result<Option<Self>, AppError> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, product_id, quantity, created
            FROM cart_items
            WHERE id = $1 AND cart_id = $2
            "#,
        )
        .bind(item_id)
        .bind(cart_id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Insert the (cart, product) row or add `quantity` to the existing one,
    /// provided the resulting quantity does not exceed `limit`. Returns `None`
    /// and leaves the row untouched when the limit would be exceeded.
    pub async fn add_quantity(
        pool: &PgPool,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
        limit: i32,
    ) -> Result<Option<Self>, AppError> {
        if quantity > limit {
            return Ok(None);
        }

        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id) DO UPDATE
                SET quantity = cart_items.quantity + EXCLUDED.quantity
                WHERE cart_items.quantity::bigint + EXCLUDED.quantity <= $4
            RETURNING id, cart_id, product_id, quantity, created
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(limit)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    pub async fn set_quantity(pool: &PgPool, item_id: i64, quantity: i32) -> Result<Option<Self>, AppError> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items SET quantity = $2
            WHERE id = $1
            RETURNING id, cart_id, product_id, quantity, created
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    pub async fn delete(pool: &PgPool, item_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(item_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// A cart item joined with the product it references, priced live.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Product,
}

impl CartLine {
    pub fn total_price(&self) -> Decimal {
        self.product.final_price() * Decimal::from(self.item.quantity)
    }

    pub fn to_response(&self) -> CartItemResponse {
        let total_price = self.total_price();
        CartItemResponse {
            id: self.item.id,
            product: self.product.to_response(),
            quantity: self.item.quantity,
            total_price,
            formatted_total_price: format_price(total_price),
            created: self.item.created,
        }
    }
}

/// A cart with its current lines. Totals are recomputed from the lines on
/// every call.
#[derive(Debug, Clone)]
pub struct CartSummary {
    pub cart: Cart,
    pub lines: Vec<CartLine>,
}

impl CartSummary {
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.item.quantity)).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    pub fn to_response(&self) -> CartResponse {
        let total_price = self.total_price();
        CartResponse {
            id: self.cart.id,
            session_key: self.cart.session_key.clone(),
            items: self.lines.iter().map(CartLine::to_response).collect(),
            total_items: self.total_items(),
            total_price,
            formatted_total_price: format_price(total_price),
            created: self.cart.created,
            updated: self.cart.updated,
        }
    }
}
