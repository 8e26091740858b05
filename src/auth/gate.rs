//! Per-handler role checks over the [`Principal`] left by the authenticator.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::claims::{Principal, Role};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AdminOnly,
    UserOnly,
    EitherRole,
}

impl Policy {
    pub fn permits(self, role: Role) -> bool {
        match self {
            Policy::AdminOnly => role == Role::Admin,
            Policy::UserOnly => role == Role::User,
            Policy::EitherRole => matches!(role, Role::Admin | Role::User),
        }
    }

    fn denial(self) -> &'static str {
        match self {
            Policy::AdminOnly => "Only admins can access this endpoint",
            Policy::UserOnly => "Only users can access this endpoint",
            Policy::EitherRole => "Either admin or user can access this endpoint",
        }
    }

    pub fn authorize(self, principal: Option<&Principal>) -> Result<Principal, AppError> {
        match principal {
            Some(p) if self.permits(p.role) => Ok(p.clone()),
            Some(p) => {
                warn!(email = %p.email, role = p.role.as_str(), policy = ?self, "role denied");
                Err(AppError::Forbidden(self.denial().into()))
            }
            None => {
                warn!(policy = ?self, "no principal on request");
                Err(AppError::Forbidden(self.denial().into()))
            }
        }
    }
}

fn authorize_parts(parts: &Parts, policy: Policy) -> Result<Principal, AppError> {
    policy.authorize(parts.extensions.get::<Principal>())
}

/// Admits admins only.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Principal);

/// Admits regular users only.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Principal);

/// Admits admins and regular users.
#[derive(Debug, Clone)]
pub struct RequireEitherRole(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, Policy::AdminOnly).map(RequireAdmin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, Policy::UserOnly).map(RequireUser)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireEitherRole
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, Policy::EitherRole).map(RequireEitherRole)
    }
}
