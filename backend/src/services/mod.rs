//! Business services behind the HTTP handlers.

pub mod cart_service;
pub mod catalog_service;
pub mod listing_service;

pub use cart_service::{CartService, CartUpdate};
pub use catalog_service::CatalogService;
pub use listing_service::{ListingQuery, ListingService};

use crate::repositories::Repositories;

/// Every service the application registers, built over one set of
/// repositories.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
    pub listing: ListingService,
    pub cart: CartService,
}

impl AppServices {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            catalog: CatalogService::new(repositories.clone()),
            listing: ListingService::new(repositories.clone()),
            cart: CartService::new(repositories),
        }
    }
}
