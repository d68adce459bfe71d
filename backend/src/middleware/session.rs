use actix_web::{
    cookie::{Cookie, SameSite},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};
use storefront_shared::{DEFAULT_SESSION_COOKIE, SESSION_KEY_LENGTH};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;

/// Maximum session key length accepted from a client cookie.
const MAX_SESSION_KEY_LENGTH: usize = 40;

/// Cookie settings for visitor sessions.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secure: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            secure: false,
        }
    }
}

impl SessionSettings {
    fn cookie(&self, key: String) -> Cookie<'static> {
        Cookie::build(self.cookie_name.clone(), key)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .finish()
    }
}

/// The opaque per-visitor identifier that scopes a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorSession {
    pub key: String,
    /// Minted for this request; the response carries the new cookie.
    pub is_new: bool,
}

impl VisitorSession {
    fn mint() -> Self {
        let key = Uuid::new_v4().simple().to_string();
        debug_assert_eq!(key.len(), SESSION_KEY_LENGTH);
        Self { key, is_new: true }
    }
}

fn is_valid_session_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_SESSION_KEY_LENGTH
        && key.chars().all(|c| c.is_ascii_alphanumeric())
}

impl FromRequest for VisitorSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let session = req
            .extensions()
            .get::<VisitorSession>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Session middleware is not installed".to_string()));
        ready(session)
    }
}

/// Resolves the visitor session from its cookie, minting a new key when the
/// cookie is absent or malformed.
pub struct SessionMiddleware {
    settings: Rc<SessionSettings>,
}

impl SessionMiddleware {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings: Rc::new(settings),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service,
            settings: self.settings.clone(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
    settings: Rc<SessionSettings>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = match req.cookie(&self.settings.cookie_name) {
            Some(cookie) if is_valid_session_key(cookie.value()) => VisitorSession {
                key: cookie.value().to_string(),
                is_new: false,
            },
            _ => {
                let session = VisitorSession::mint();
                debug!("Started session {}", session.key);
                session
            }
        };

        let new_cookie = session.is_new.then(|| self.settings.cookie(session.key.clone()));
        req.extensions_mut().insert(session);

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if let Some(cookie) = new_cookie {
                res.response_mut().add_cookie(&cookie)?;
            }
            Ok(res)
        })
    }
}
