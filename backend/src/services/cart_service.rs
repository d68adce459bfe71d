use std::collections::HashMap;
use std::sync::Arc;
use storefront_shared::{ERROR_CART_ITEM_NOT_FOUND, ERROR_INVALID_QUANTITY, ERROR_PRODUCT_NOT_FOUND};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::{Cart, CartItem, CartLine, CartSummary, Product, ProductLookup};
use crate::repositories::{CartRepository, CatalogRepository, Repositories};

/// Result of a quantity update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    Updated(CartItem),
    /// The requested quantity was zero or negative and the item was deleted.
    Removed,
}

/// Session carts and the add/update/remove/clear mutations on them. Stock is
/// compared against, never decremented.
#[derive(Clone)]
pub struct CartService {
    catalog: Arc<dyn CatalogRepository>,
    carts: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            catalog: repositories.catalog,
            carts: repositories.carts,
        }
    }

    pub async fn get_or_create_cart(&self, session_key: &str) -> Result<Cart, AppError> {
        self.carts.get_or_create_cart(session_key).await
    }

    /// The session's cart, which must already exist. Item mutations go through
    /// this so they can only touch the caller's own items.
    pub async fn existing_cart(&self, session_key: &str) -> Result<Cart, AppError> {
        self.carts
            .find_cart_by_session(session_key)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_CART_ITEM_NOT_FOUND.to_string()))
    }

    /// The cart with its items in insertion order, each priced from the
    /// product as it is now.
    pub async fn summary(&self, cart: Cart) -> Result<CartSummary, AppError> {
        let items = self.carts.list_items(cart.id).await?;
        let product_ids: Vec<i64> = items.iter().map(|item| item.product_id).collect();
        let products: HashMap<i64, Product> = self
            .catalog
            .find_products_by_ids(&product_ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            match products.get(&item.product_id) {
                Some(product) => lines.push(CartLine {
                    product: product.clone(),
                    item,
                }),
                None => warn!(
                    "Cart {} item {} references missing product {}",
                    cart.id, item.id, item.product_id
                ),
            }
        }

        debug!("Cart {} has {} lines", cart.id, lines.len());
        Ok(CartSummary { cart, lines })
    }

    /// Add `quantity` of `product` to the cart, merging with an existing item
    /// for the same product. Fails with `InsufficientStock`, leaving the cart
    /// unchanged, when the requested or the combined quantity exceeds stock.
    pub async fn add(&self, cart: &Cart, product: &Product, quantity: i32) -> Result<CartItem, AppError> {
        if quantity < 1 {
            return Err(AppError::Validation(ERROR_INVALID_QUANTITY.to_string()));
        }

        let insufficient = || AppError::InsufficientStock {
            product: product.name.clone(),
            requested: quantity,
            available: product.stock,
        };

        if quantity > product.stock {
            warn!(
                "Cart {}: requested {} of product {} with stock {}",
                cart.id, quantity, product.id, product.stock
            );
            return Err(insufficient());
        }

        let item = self
            .carts
            .add_item_quantity(cart.id, product.id, quantity, product.stock)
            .await?
            .ok_or_else(|| {
                warn!(
                    "Cart {}: adding {} of product {} would exceed stock {}",
                    cart.id, quantity, product.id, product.stock
                );
                insufficient()
            })?;

        info!(
            "Cart {}: product {} quantity now {} (item {})",
            cart.id, product.id, item.quantity, item.id
        );
        Ok(item)
    }

    /// Set an item's quantity. Zero or less deletes the item; more than the
    /// product's stock fails with `InsufficientStock` and changes nothing.
    pub async fn update(&self, cart: &Cart, item_id: i64, quantity: i32) -> Result<CartUpdate, AppError> {
        let item = self.find_item(cart, item_id).await?;
        let product = self
            .catalog
            .find_product(&ProductLookup::Id(item.product_id), false)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_PRODUCT_NOT_FOUND.to_string()))?;

        if quantity > product.stock {
            warn!(
                "Cart {}: item {} update to {} exceeds stock {}",
                cart.id, item.id, quantity, product.stock
            );
            return Err(AppError::InsufficientStock {
                product: product.name,
                requested: quantity,
                available: product.stock,
            });
        }

        if quantity <= 0 {
            self.carts.delete_item(item.id).await?;
            info!("Cart {}: item {} removed by quantity update", cart.id, item.id);
            return Ok(CartUpdate::Removed);
        }

        let updated = self
            .carts
            .set_item_quantity(item.id, quantity)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_CART_ITEM_NOT_FOUND.to_string()))?;

        info!("Cart {}: item {} quantity set to {}", cart.id, updated.id, updated.quantity);
        Ok(CartUpdate::Updated(updated))
    }

    pub async fn remove(&self, cart: &Cart, item_id: i64) -> Result<(), AppError> {
        let item = self.find_item(cart, item_id).await?;
        self.carts.delete_item(item.id).await?;

        info!("Cart {}: item {} removed", cart.id, item.id);
        Ok(())
    }

    /// Delete every item. The cart itself remains.
    pub async fn clear(&self, cart: &Cart) -> Result<u64, AppError> {
        let removed = self.carts.clear_items(cart.id).await?;

        info!("Cart {}: cleared {} items", cart.id, removed);
        Ok(removed)
    }

    async fn find_item(&self, cart: &Cart, item_id: i64) -> Result<CartItem, AppError> {
        self.carts
            .find_item(cart.id, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_CART_ITEM_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCategory, NewProduct, ProductChanges};
    use rust_decimal::Decimal;

    struct Fixture {
        service: CartService,
        catalog: Arc<dyn CatalogRepository>,
        cart: Cart,
        category_id: i64,
    }

    async fn fixture() -> Fixture {
        let repositories = Repositories::in_memory();
        let category = repositories
            .catalog
            .create_category(&NewCategory::new("Kitchen"))
            .await
            .unwrap();
        let service = CartService::new(repositories.clone());
        let cart = service.get_or_create_cart("0123456789abcdef0123456789abcdef").await.unwrap();
        Fixture {
            service,
            catalog: repositories.catalog,
            cart,
            category_id: category.id,
        }
    }

    impl Fixture {
        async fn product(&self, name: &str, price: i64, stock: i32) -> Product {
            self.catalog
                .create_product(&NewProduct::new(self.category_id, name, Decimal::from(price), stock))
                .await
                .unwrap()
        }

        async fn items(&self) -> Vec<CartItem> {
            self.service
                .summary(self.cart.clone())
                .await
                .unwrap()
                .lines
                .into_iter()
                .map(|line| line.item)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_adding_twice_merges_into_one_item() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 5).await;

        f.service.add(&f.cart, &kettle, 2).await.unwrap();
        let item = f.service.add(&f.cart, &kettle, 3).await.unwrap();

        assert_eq!(item.quantity, 5);
        let items = f.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_creates_nothing() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 2).await;

        let result = f.service.add(&f.cart, &kettle, 3).await;
        assert!(matches!(
            result,
            Err(AppError::InsufficientStock { requested: 3, available: 2, .. })
        ));
        assert!(f.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_combined_quantity_beyond_stock_leaves_item_unchanged() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 4).await;

        f.service.add(&f.cart, &kettle, 3).await.unwrap();
        let result = f.service.add(&f.cart, &kettle, 2).await;

        assert!(matches!(result, Err(AppError::InsufficientStock { .. })));
        assert_eq!(f.items().await[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_combined_quantity_past_i32_range_is_insufficient_stock() {
        let f = fixture().await;
        let pallet = f.product("Pallet", 1, i32::MAX).await;

        f.service.add(&f.cart, &pallet, i32::MAX).await.unwrap();
        let result = f.service.add(&f.cart, &pallet, 1).await;

        assert!(matches!(result, Err(AppError::InsufficientStock { .. })));
        assert_eq!(f.items().await[0].quantity, i32::MAX);
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_quantity() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 4).await;

        let result = f.service.add(&f.cart, &kettle, 0).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(f.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_to_zero_or_negative_removes_item() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 4).await;
        let toaster = f.product("Toaster", 2_000, 4).await;
        let first = f.service.add(&f.cart, &kettle, 1).await.unwrap();
        let second = f.service.add(&f.cart, &toaster, 1).await.unwrap();

        assert_eq!(f.service.update(&f.cart, first.id, 0).await.unwrap(), CartUpdate::Removed);
        assert_eq!(f.service.update(&f.cart, second.id, -3).await.unwrap(), CartUpdate::Removed);
        assert!(f.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_beyond_stock_keeps_quantity() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 4).await;
        let item = f.service.add(&f.cart, &kettle, 2).await.unwrap();

        let result = f.service.update(&f.cart, item.id, 5).await;
        assert!(matches!(result, Err(AppError::InsufficientStock { .. })));
        assert_eq!(f.items().await[0].quantity, 2);

        let updated = f.service.update(&f.cart, item.id, 4).await.unwrap();
        assert!(matches!(updated, CartUpdate::Updated(ref item) if item.quantity == 4));
    }

    #[tokio::test]
    async fn test_items_of_other_carts_are_not_found() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 4).await;
        let item = f.service.add(&f.cart, &kettle, 1).await.unwrap();
        let stranger = f.service.get_or_create_cart("ffffffffffffffffffffffffffffffff").await.unwrap();

        assert!(matches!(
            f.service.update(&stranger, item.id, 2).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.remove(&stranger, item.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(f.items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_and_missing_item() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 4).await;
        let item = f.service.add(&f.cart, &kettle, 1).await.unwrap();

        f.service.remove(&f.cart, item.id).await.unwrap();
        assert!(f.items().await.is_empty());
        assert!(matches!(
            f.service.remove(&f.cart, item.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_clear_keeps_cart_for_session() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 4).await;
        let toaster = f.product("Toaster", 2_000, 4).await;
        f.service.add(&f.cart, &kettle, 1).await.unwrap();
        f.service.add(&f.cart, &toaster, 2).await.unwrap();

        assert_eq!(f.service.clear(&f.cart).await.unwrap(), 2);

        let cart = f.service.existing_cart(&f.cart.session_key).await.unwrap();
        assert_eq!(cart.id, f.cart.id);
        assert!(f.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_totals_track_live_product_prices() {
        let f = fixture().await;
        let kettle = f.product("Kettle", 1_000, 10).await;
        let toaster = f.product("Toaster", 2_000, 10).await;
        f.service.add(&f.cart, &kettle, 2).await.unwrap();
        f.service.add(&f.cart, &toaster, 1).await.unwrap();

        let summary = f.service.summary(f.cart.clone()).await.unwrap();
        assert_eq!(summary.total_items(), 3);
        assert_eq!(summary.total_price(), Decimal::from(4_000));

        f.catalog
            .update_product(
                kettle.id,
                &ProductChanges {
                    discount_price: Some(Some(Decimal::from(750))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let summary = f.service.summary(f.cart.clone()).await.unwrap();
        assert_eq!(summary.total_price(), Decimal::from(3_500));
        assert_eq!(summary.lines[0].item.product_id, kettle.id);
    }
}
