use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use storefront_shared::SortOrder;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{
    Cart, CartItem, Category, NewCategory, NewProduct, Product, ProductChanges, ProductFilter,
    ProductLookup,
};
use crate::repositories::{CartRepository, CatalogRepository};

/// Process-local store implementing both repositories with the same
/// uniqueness rules as the Postgres schema. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    categories: Vec<Category>,
    products: Vec<Product>,
    carts: Vec<Cart>,
    items: Vec<CartItem>,
    last_category_id: i64,
    last_product_id: i64,
    last_cart_id: i64,
    last_item_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn create_category(&self, request: &NewCategory) -> Result<Category, AppError> {
        let slug = request.resolved_slug()?;
        let mut state = self.state.write().await;

        if state.categories.iter().any(|c| c.slug == slug) {
            return Err(AppError::DuplicateSlug(slug));
        }

        let now = Utc::now();
        let category = Category {
            id: next_id(&mut state.last_category_id),
            name: request.name.clone(),
            slug,
            image: request.image.clone(),
            created: now,
            updated: now,
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError> {
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list_categories(&self, limit: Option<i64>) -> Result<Vec<Category>, AppError> {
        let state = self.state.read().await;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        if let Some(limit) = limit {
            categories.truncate(limit.max(0) as usize);
        }
        Ok(categories)
    }

    async fn count_available_products(&self, category_id: i64) -> Result<i64, AppError> {
        let state = self.state.read().await;
        let count = state
            .products
            .iter()
            .filter(|p| p.category_id == category_id && p.available)
            .count();
        Ok(count as i64)
    }

    async fn create_product(&self, request: &NewProduct) -> Result<Product, AppError> {
        let slug = request.resolved_slug()?;
        let mut state = self.state.write().await;

        if !state.categories.iter().any(|c| c.id == request.category_id) {
            return Err(AppError::NotFound(format!(
                "Category {} does not exist",
                request.category_id
            )));
        }
        if state.products.iter().any(|p| p.slug == slug) {
            return Err(AppError::DuplicateSlug(slug));
        }

        let now = Utc::now();
        let product = Product {
            id: next_id(&mut state.last_product_id),
            category_id: request.category_id,
            name: request.name.clone(),
            slug,
            image: request.image.clone(),
            description: request.description.clone(),
            short_description: request.short_description.clone(),
            price: request.price,
            discount_price: request.discount_price,
            stock: request.stock,
            available: request.available,
            featured: request.featured,
            created: now,
            updated: now,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i64,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, AppError> {
        let mut state = self.state.write().await;
        let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        changes.apply(product);
        product.updated = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn find_product(
        &self,
        lookup: &ProductLookup,
        must_be_available: bool,
    ) -> Result<Option<Product>, AppError> {
        let state = self.state.read().await;
        let product = state
            .products
            .iter()
            .find(|p| match lookup {
                ProductLookup::Id(id) => p.id == *id,
                ProductLookup::Slug(slug) => p.slug == *slug,
            })
            .filter(|p| !must_be_available || p.available)
            .cloned();
        Ok(product)
    }

    async fn find_products_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        let state = self.state.read().await;
        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        match filter.sort {
            SortOrder::Name => products.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then(a.id.cmp(&b.id))
            }),
            SortOrder::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id))),
            SortOrder::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price).then(b.id.cmp(&a.id))),
            SortOrder::Newest => {
                products.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)))
            }
        }

        let offset = filter.offset.max(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |limit| limit.max(0) as usize);
        Ok(products.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<i64, AppError> {
        let state = self.state.read().await;
        Ok(state.products.iter().filter(|p| filter.matches(p)).count() as i64)
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn get_or_create_cart(&self, session_key: &str) -> Result<Cart, AppError> {
        let mut state = self.state.write().await;
        if let Some(cart) = state.carts.iter().find(|c| c.session_key == session_key) {
            return Ok(cart.clone());
        }

        let now = Utc::now();
        let cart = Cart {
            id: next_id(&mut state.last_cart_id),
            session_key: session_key.to_string(),
            created: now,
            updated: now,
        };
        state.carts.push(cart.clone());
        Ok(cart)
    }

    async fn find_cart_by_session(&self, session_key: &str) -> Result<Option<Cart>, AppError> {
        let state = self.state.read().await;
        Ok(state.carts.iter().find(|c| c.session_key == session_key).cloned())
    }

    async fn list_items(&self, cart_id: i64) -> Result<Vec<CartItem>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .filter(|i| i.cart_id == cart_id)
            .cloned()
            .collect())
    }

    async fn find_item(&self, cart_id: i64, item_id: i64) -> Result<Option<CartItem>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .find(|i| i.id == item_id && i.cart_id == cart_id)
            .cloned())
    }

    async fn add_item_quantity(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
        limit: i32,
    ) -> Result<Option<CartItem>, AppError> {
        let mut state = self.state.write().await;

        if let Some(item) = state
            .items
            .iter_mut()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
        {
            let Some(combined) = item.quantity.checked_add(quantity).filter(|c| *c <= limit) else {
                return Ok(None);
            };
            item.quantity = combined;
            return Ok(Some(item.clone()));
        }

        if quantity > limit {
            return Ok(None);
        }

        let item = CartItem {
            id: next_id(&mut state.last_item_id),
            cart_id,
            product_id,
            quantity,
            created: Utc::now(),
        };
        state.items.push(item.clone());
        Ok(Some(item))
    }

    async fn set_item_quantity(&self, item_id: i64, quantity: i32) -> Result<Option<CartItem>, AppError> {
        let mut state = self.state.write().await;
        let Some(item) = state.items.iter_mut().find(|i| i.id == item_id) else {
            return Ok(None);
        };

        item.quantity = quantity;
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|i| i.id != item_id);
        Ok(state.items.len() < before)
    }

    async fn clear_items(&self, cart_id: i64) -> Result<u64, AppError> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|i| i.cart_id != cart_id);
        Ok((before - state.items.len()) as u64)
    }
}
