/// Authentication Gate
///
/// Middleware for protected routes: extracts the bearer token from the
/// Authorization header, verifies it, and injects the decoded claims into
/// request extensions for route handlers to read via `web::ReqData<Claims>`.
/// It touches nothing else: no store access, no other side effects.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::verify_token;
use crate::configuration::AuthSettings;
use crate::error::AppError;

/// Pull the credential out of an Authorization header value.
///
/// The header is split on whitespace and the second segment is taken; the
/// scheme word itself is never inspected. A header with no second segment
/// (for example a bare "Bearer") yields `None`, same as a missing header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header.split_whitespace().nth(1)
}

/// Gate middleware for routes that require an authenticated identity.
pub struct AuthMiddleware {
    auth_config: AuthSettings,
}

impl AuthMiddleware {
    pub fn new(auth_config: AuthSettings) -> Self {
        Self { auth_config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            auth_config: self.auth_config.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    auth_config: AuthSettings,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_bearer_token)
            .map(str::to_owned);

        let token = match token {
            Some(token) => token,
            None => {
                return Box::pin(async move {
                    Err(AppError::unauthenticated("Token must be provided").into())
                });
            }
        };

        match verify_token(&token, &self.auth_config) {
            Ok(claims) => {
                tracing::debug!(user_id = %claims.sub, "session token verified");
                req.extensions_mut().insert(claims);

                let service = Rc::clone(&self.service);
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => Box::pin(async move { Err(e.into()) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_segment_is_the_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn scheme_word_is_not_inspected() {
        // Any first segment is skipped; the credential still reaches the
        // codec, where a non-token fails verification.
        assert_eq!(extract_bearer_token("Basic abc"), Some("abc"));
    }

    #[test]
    fn bare_scheme_yields_no_token() {
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token("Bearer   "), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn extra_segments_are_ignored() {
        assert_eq!(extract_bearer_token("Bearer abc extra"), Some("abc"));
    }
}
