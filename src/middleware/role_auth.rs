use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::user::UserRole;

/// Admits requests whose token role is in the allowed set. Admins always pass.
///
/// Must be wrapped inside `AuthMiddleware` so the claims are present.
pub struct RequireRole {
    allowed: Rc<Vec<UserRole>>,
}

impl RequireRole {
    pub fn new(role: UserRole) -> Self {
        Self::any_of(&[role])
    }

    pub fn any_of(roles: &[UserRole]) -> Self {
        RequireRole {
            allowed: Rc::new(roles.to_vec()),
        }
    }

    pub fn staff() -> Self {
        Self::any_of(&[UserRole::Admin, UserRole::Employee])
    }

    pub fn admits(allowed: &[UserRole], role: UserRole) -> bool {
        role == UserRole::Admin || allowed.contains(&role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            allowed: Rc::clone(&self.allowed),
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    allowed: Rc<Vec<UserRole>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
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
        let role = req.extensions().get::<Claims>().map(|claims| claims.role);

        match role {
            Some(role) if RequireRole::admits(&self.allowed, role) => {
                Box::pin(self.service.call(req))
            }
            Some(role) => {
                log::info!(
                    "Access denied for {:?} on {} (allowed: {:?})",
                    role,
                    req.path(),
                    self.allowed
                );
                Box::pin(ready(Err(ApiError::Forbidden(
                    "Insufficient permissions".to_string(),
                )
                .into())))
            }
            None => Box::pin(ready(Err(
                ApiError::Unauthorized("No authorization".to_string()).into()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_always_admitted() {
        assert!(RequireRole::admits(&[UserRole::Client], UserRole::Admin));
        assert!(RequireRole::admits(&[], UserRole::Admin));
    }

    #[test]
    fn test_roles_outside_the_set_are_refused() {
        let staff = [UserRole::Admin, UserRole::Employee];
        assert!(RequireRole::admits(&staff, UserRole::Employee));
        assert!(!RequireRole::admits(&staff, UserRole::Client));
        assert!(!RequireRole::admits(&[UserRole::Client], UserRole::Employee));
    }
}
