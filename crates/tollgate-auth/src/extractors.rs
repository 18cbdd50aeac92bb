// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Axum extractors for the attached authentication.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::Authentication;
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Returns 401 if the authentication middleware attached no principal.
///
/// ```rust,ignore
/// async fn handler(Auth(auth): Auth) -> impl IntoResponse {
///     format!("Hello, {}", auth.identity())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Auth(pub Authentication);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Authentication>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// =============================================================================
// Optional Auth Extractor
// =============================================================================

/// Extractor for optionally authenticated requests. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Authentication>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<Authentication>().cloned()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Principal, Role};
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    fn parts(auth: Option<Authentication>) -> Parts {
        let mut req = Request::builder().uri("/").body(()).unwrap();
        if let Some(auth) = auth {
            req.extensions_mut().insert(auth);
        }
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_auth_extractor() {
        let auth = Authentication::new(Principal::new("alice@example.com", Role::Manager));
        let Auth(extracted) = Auth::from_request_parts(&mut parts(Some(auth)), &()).await.unwrap();
        assert_eq!(extracted.identity(), "alice@example.com");

        let rejection = Auth::from_request_parts(&mut parts(None), &()).await.unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_optional_auth_extractor() {
        let OptionalAuth(none) = OptionalAuth::from_request_parts(&mut parts(None), &()).await.unwrap();
        assert!(none.is_none());

        let auth = Authentication::new(Principal::new("alice@example.com", Role::User));
        let OptionalAuth(some) = OptionalAuth::from_request_parts(&mut parts(Some(auth)), &()).await.unwrap();
        assert_eq!(some.map(|a| a.role()), Some(Role::User));
    }
}
