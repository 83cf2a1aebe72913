use crate::error::{AppError, AppResult};
use crate::utils::{JwtService, SessionUser};
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

pub const SESSION_COOKIE: &str = "session";

/// Decodes the `session` cookie into a [`SessionUser`] request extension.
/// It never rejects; routes that need a session either call [`require_user`]
/// or sit behind [`RequireAdmin`].
pub struct SessionMiddleware {
    jwt_service: JwtService,
}

impl SessionMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
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
            jwt_service: self.jwt_service.clone(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
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
        let user = req.cookie(SESSION_COOKIE).and_then(|cookie| {
            match self.jwt_service.verify_session_token(cookie.value()) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::debug!("Ignoring session cookie: {e}");
                    None
                }
            }
        });

        if let Some(user) = user {
            req.extensions_mut().insert(user);
        }
        Box::pin(self.service.call(req))
    }
}

/// Guard for the admin scope. It is attached to the routes themselves, so it
/// applies to whatever the router matched, however the path was spelled.
/// Needs [`SessionMiddleware`] further out.
pub struct RequireAdmin;

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAdminService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAdminService { service }))
    }
}

pub struct RequireAdminService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAdminService<S>
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
        // CORS preflight never carries the cookie
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        let rejection = admin_rejection(req.extensions().get::<SessionUser>());
        if let Some(error) = rejection {
            return Box::pin(async move { Err(error.into()) });
        }
        Box::pin(self.service.call(req))
    }
}

fn admin_rejection(user: Option<&SessionUser>) -> Option<AppError> {
    match user {
        None => Some(AppError::AuthError("Please sign in first".to_string())),
        Some(u) if !u.is_admin() => Some(AppError::Forbidden),
        Some(_) => None,
    }
}

/// Session of the current request, if the cookie was valid.
pub fn current_user(req: &HttpRequest) -> Option<SessionUser> {
    req.extensions().get::<SessionUser>().cloned()
}

pub fn require_user(req: &HttpRequest) -> AppResult<SessionUser> {
    current_user(req).ok_or_else(|| AppError::AuthError("Please sign in first".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;

    fn session(role: UserRole) -> SessionUser {
        SessionUser {
            id: 1,
            email: "pengurus@masjid.example".to_string(),
            name: "Pengurus".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_rejection() {
        assert!(matches!(admin_rejection(None), Some(AppError::AuthError(_))));
        assert!(matches!(
            admin_rejection(Some(&session(UserRole::User))),
            Some(AppError::Forbidden)
        ));
        assert!(admin_rejection(Some(&session(UserRole::Admin))).is_none());
    }
}
