use actix_web::{web, HttpResponse};
use serde::Deserialize;
use storefront_shared::{
    CartPageResponse, DEFAULT_CART_QUANTITY, ERROR_INSUFFICIENT_STOCK, ERROR_INVALID_QUANTITY,
    SUCCESS_ADDED_TO_CART, SUCCESS_CART_CLEARED, SUCCESS_CART_UPDATED, SUCCESS_ITEM_REMOVED,
};
use tracing::{debug, warn};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::{redirect_with_flash, FlashMessage, IncomingFlash, VisitorSession};
use crate::models::ProductLookup;
use crate::services::{CartService, CartUpdate, CatalogService};

pub const CART_PATH: &str = "/cart/";

fn default_quantity() -> i32 {
    DEFAULT_CART_QUANTITY
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartForm {
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// The visitor's cart with live totals. Creates the cart on first visit.
pub async fn cart_detail(
    session: VisitorSession,
    flash: IncomingFlash,
    carts: web::Data<CartService>,
) -> Result<HttpResponse, AppError> {
    let cart = carts.get_or_create_cart(&session.key).await?;
    let summary = carts.summary(cart).await?;

    Ok(flash.render(&CartPageResponse {
        notice: flash.notice(),
        cart: summary.to_response(),
    }))
}

pub async fn add_to_cart(
    product_id: web::Path<i64>,
    form: Result<web::Form<AddToCartForm>, actix_web::Error>,
    session: VisitorSession,
    catalog: web::Data<CatalogService>,
    carts: web::Data<CartService>,
) -> Result<HttpResponse, AppError> {
    let product = catalog
        .get_product(ProductLookup::Id(product_id.into_inner()), true)
        .await?;

    // A missing product is reported before a malformed form.
    let form = form.map_err(|e| AppError::Validation(e.to_string()))?;

    if let Err(errors) = form.validate() {
        warn!("Rejected add-to-cart quantity for product {}: {}", product.id, errors);
        return redirect_with_flash(&product.url(), FlashMessage::error(ERROR_INVALID_QUANTITY));
    }

    debug!(
        "Session {} adding {} of product {}",
        session.key, form.quantity, product.id
    );

    let cart = carts.get_or_create_cart(&session.key).await?;
    match carts.add(&cart, &product, form.quantity).await {
        Ok(_) => redirect_with_flash(
            CART_PATH,
            FlashMessage::success(format!("{} {}", product.name, SUCCESS_ADDED_TO_CART)),
        ),
        Err(AppError::InsufficientStock { .. }) => {
            redirect_with_flash(&product.url(), FlashMessage::error(ERROR_INSUFFICIENT_STOCK))
        }
        Err(e) => Err(e),
    }
}

pub async fn update_cart_item(
    item_id: web::Path<i64>,
    form: web::Form<UpdateCartForm>,
    session: VisitorSession,
    carts: web::Data<CartService>,
) -> Result<HttpResponse, AppError> {
    let cart = carts.existing_cart(&session.key).await?;

    match carts.update(&cart, item_id.into_inner(), form.quantity).await {
        Ok(CartUpdate::Updated(_)) => {
            redirect_with_flash(CART_PATH, FlashMessage::success(SUCCESS_CART_UPDATED))
        }
        Ok(CartUpdate::Removed) => {
            redirect_with_flash(CART_PATH, FlashMessage::success(SUCCESS_ITEM_REMOVED))
        }
        Err(AppError::InsufficientStock { .. }) => {
            redirect_with_flash(CART_PATH, FlashMessage::error(ERROR_INSUFFICIENT_STOCK))
        }
        Err(e) => Err(e),
    }
}

pub async fn remove_from_cart(
    item_id: web::Path<i64>,
    session: VisitorSession,
    carts: web::Data<CartService>,
) -> Result<HttpResponse, AppError> {
    let cart = carts.existing_cart(&session.key).await?;
    carts.remove(&cart, item_id.into_inner()).await?;

    redirect_with_flash(CART_PATH, FlashMessage::success(SUCCESS_ITEM_REMOVED))
}

pub async fn clear_cart(
    session: VisitorSession,
    carts: web::Data<CartService>,
) -> Result<HttpResponse, AppError> {
    let cart = carts.get_or_create_cart(&session.key).await?;
    carts.clear(&cart).await?;

    redirect_with_flash(CART_PATH, FlashMessage::success(SUCCESS_CART_CLEARED))
}
