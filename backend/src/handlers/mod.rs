//! HTTP handlers for the storefront pages and cart actions.

use actix_web::web;

use crate::services::AppServices;

pub mod cart;
pub mod catalog;
pub mod health;

/// Register the services and every storefront route.
pub fn configure(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.app_data(web::Data::new(services.catalog.clone()))
        .app_data(web::Data::new(services.listing.clone()))
        .app_data(web::Data::new(services.cart.clone()))
        .service(health::health_check)
        .route("/", web::get().to(catalog::home))
        .route("/products/", web::get().to(catalog::product_list))
        .route("/category/{slug}/", web::get().to(catalog::products_by_category))
        .route("/product/{slug}/", web::get().to(catalog::product_detail))
        .route("/cart/", web::get().to(cart::cart_detail))
        .route("/add-to-cart/{product_id}/", web::post().to(cart::add_to_cart))
        .route("/update-cart/{item_id}/", web::post().to(cart::update_cart_item))
        .route("/remove-from-cart/{item_id}/", web::post().to(cart::remove_from_cart))
        .route("/clear-cart/", web::post().to(cart::clear_cart));
}
