//! Shared fixtures for the HTTP tests: an in-memory storefront app with a
//! small seeded catalog, plus cookie helpers.

#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    App,
};
use rust_decimal::Decimal;
use storefront_backend::handlers;
use storefront_backend::middleware::{SessionMiddleware, SessionSettings};
use storefront_backend::models::{Category, NewCategory, NewProduct, Product};
use storefront_backend::repositories::Repositories;
use storefront_backend::services::AppServices;

pub const SESSION_COOKIE: &str = "sessionid";
pub const FLASH_COOKIE: &str = "flash";

pub struct Fixture {
    pub services: AppServices,
    pub shoes: Category,
    pub hats: Category,
    /// 1,250,000, stock 5, featured.
    pub trail_runner: Product,
    /// 900,000 discounted to 750,000, stock 2.
    pub city_loafer: Product,
    /// Not available for sale.
    pub retired_boot: Product,
    /// 150,000, stock 10.
    pub wool_beanie: Product,
}

pub async fn seeded() -> Fixture {
    let services = AppServices::new(Repositories::in_memory());
    let catalog = &services.catalog;

    let shoes = catalog.create_category(NewCategory::new("Shoes")).await.unwrap();
    let hats = catalog.create_category(NewCategory::new("Hats")).await.unwrap();

    let mut runner = NewProduct::new(shoes.id, "Trail Runner", Decimal::from(1_250_000), 5);
    runner.featured = true;
    let trail_runner = catalog.create_product(runner).await.unwrap();

    let mut loafer = NewProduct::new(shoes.id, "City Loafer", Decimal::from(900_000), 2);
    loafer.discount_price = Some(Decimal::from(750_000));
    let city_loafer = catalog.create_product(loafer).await.unwrap();

    let mut retired = NewProduct::new(shoes.id, "Retired Boot", Decimal::from(500_000), 3);
    retired.available = false;
    let retired_boot = catalog.create_product(retired).await.unwrap();

    let wool_beanie = catalog
        .create_product(NewProduct::new(hats.id, "Wool Beanie", Decimal::from(150_000), 10))
        .await
        .unwrap();

    Fixture {
        services,
        shoes,
        hats,
        trail_runner,
        city_loafer,
        retired_boot,
        wool_beanie,
    }
}

pub fn app(
    services: AppServices,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(SessionMiddleware::new(SessionSettings::default()))
        .configure(move |cfg| handlers::configure(cfg, &services))
}

pub fn cookie_named<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// A fixed session cookie so a test can drive one visitor across requests.
pub fn session(key: &str) -> Cookie<'static> {
    Cookie::new(SESSION_COOKIE, key.to_string())
}
