use actix_web::{
    cookie::{time::Duration, Cookie},
    http::header,
    FromRequest, HttpRequest, HttpResponse,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Serialize;
use std::future::{ready, Ready};
use storefront_shared::{FlashLevel, Notice, FLASH_COOKIE};
use tracing::debug;

use crate::error::AppError;

/// A one-shot notice carried to the next rendered page in a cookie.
#[derive(Debug, Clone)]
pub struct FlashMessage(pub Notice);

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self(Notice {
            level: FlashLevel::Success,
            message: message.into(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self(Notice {
            level: FlashLevel::Error,
            message: message.into(),
        })
    }

    fn encode(&self) -> Result<String, AppError> {
        Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(&self.0)?))
    }

    fn decode(value: &str) -> Option<Notice> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn cookie(&self) -> Result<Cookie<'static>, AppError> {
        Ok(Cookie::build(FLASH_COOKIE, self.encode()?)
            .path("/")
            .http_only(true)
            .finish())
    }
}

/// `303 See Other` to `location`, carrying `flash` to the page rendered there.
pub fn redirect_with_flash(location: &str, flash: FlashMessage) -> Result<HttpResponse, AppError> {
    debug!("Redirecting to {} with {} notice", location, flash.0.level);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(flash.cookie()?)
        .finish())
}

/// The notice left by the previous request, if any.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(Option<Notice>);

impl IncomingFlash {
    pub fn notice(&self) -> Option<Notice> {
        self.0.clone()
    }

    /// Render `body` as JSON, expiring the flash cookie when a notice was
    /// delivered.
    pub fn render<T: Serialize>(&self, body: &T) -> HttpResponse {
        let mut response = HttpResponse::Ok();
        if self.0.is_some() {
            response.cookie(
                Cookie::build(FLASH_COOKIE, "")
                    .path("/")
                    .max_age(Duration::ZERO)
                    .finish(),
            );
        }
        response.json(body)
    }
}

impl FromRequest for IncomingFlash {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let notice = req
            .cookie(FLASH_COOKIE)
            .and_then(|cookie| FlashMessage::decode(cookie.value()));
        ready(Ok(IncomingFlash(notice)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_cookie_round_trip() {
        let flash = FlashMessage::error("Requested quantity exceeds available stock.");
        let cookie = flash.cookie().unwrap();

        let notice = FlashMessage::decode(cookie.value()).unwrap();
        assert_eq!(notice.level, FlashLevel::Error);
        assert_eq!(notice.message, "Requested quantity exceeds available stock.");
    }

    #[test]
    fn test_garbage_flash_cookie_is_ignored() {
        assert!(FlashMessage::decode("not base64 !!").is_none());
        assert!(FlashMessage::decode(&URL_SAFE_NO_PAD.encode(b"{}")).is_none());
    }
}
