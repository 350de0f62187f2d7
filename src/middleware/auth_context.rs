use std::future::{ready, Ready};

use actix_http::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::user::UserRole;

/// The caller behind a request that went through `AuthMiddleware`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u32,
    pub email: String,
    pub role: UserRole,
    pub client_id: Option<u32>,
    pub employee_id: Option<u32>,
}

impl AuthenticatedUser {
    /// The client record of a client account.
    pub fn require_client(&self) -> Result<u32, ApiError> {
        match (self.role, self.client_id) {
            (UserRole::Client, Some(client_id)) => Ok(client_id),
            _ => Err(ApiError::Forbidden(
                "Only client accounts can do this".to_string(),
            )),
        }
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.sub,
            role: claims.role,
            client_id: claims.client_id,
            employee_id: claims.employee_id,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            ready(Ok(AuthenticatedUser::from(claims.clone())))
        } else {
            ready(Err(
                ApiError::Unauthorized("User not authenticated".to_string()).into()
            ))
        }
    }
}
