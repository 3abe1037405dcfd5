//! 调用方身份
//!
//! Authentication itself happens upstream (campus SSO gateway). The gateway
//! forwards the caller as headers:
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `X-User-Id` | user id, required on every `/api/` route |
//! | `X-Role` | `admin` for staff, anything else for customers |

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::core::ServerState;
use crate::utils::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-role";
pub const ADMIN_ROLE: &str = "admin";

/// Caller identity taken from gateway headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ADMIN_ROLE)
    }

    fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                tracing::warn!(uri = %parts.uri, "Missing caller identity");
                AppError::not_authenticated()
            })?;
        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();

        Ok(Self {
            id: id.to_string(),
            role: role.to_string(),
        })
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }
        let user = Self::from_parts(parts)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// 管理员中间件 - 要求 `X-Role: admin`
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let user = CurrentUser::from_parts(&parts)?;
    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, role = %user.role, uri = %parts.uri, "Admin required");
        return Err(AppError::admin_required());
    }
    parts.extensions.insert(user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = http::Request::builder().uri("/api/cart");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_identity_from_headers() {
        let user = CurrentUser::from_parts(&parts(&[("X-User-Id", "s1234"), ("X-Role", "Admin")])).unwrap();
        assert_eq!(user.id, "s1234");
        assert!(user.is_admin());

        let user = CurrentUser::from_parts(&parts(&[("X-User-Id", "s1234")])).unwrap();
        assert!(!user.is_admin());
    }

    #[test]
    fn test_missing_or_blank_user_id_rejected() {
        let err = CurrentUser::from_parts(&parts(&[])).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::NotAuthenticated);

        let err = CurrentUser::from_parts(&parts(&[("X-User-Id", "  ")])).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::NotAuthenticated);
    }
}
