// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authority guard middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{Authentication, Authority};
use crate::error::ApiError;

// =============================================================================
// RequireAuthority
// =============================================================================

/// Layer that rejects requests lacking the required authorities.
///
/// Requests without an [`Authentication`] get 401, requests whose
/// authorities do not satisfy the requirement get 403.
#[derive(Clone)]
pub struct RequireAuthority {
    required: Arc<Vec<Authority>>,
    require_all: bool,
}

impl RequireAuthority {
    /// Requires a single authority.
    pub fn require(authority: impl Into<Authority>) -> Self {
        Self {
            required: Arc::new(vec![authority.into()]),
            require_all: true,
        }
    }

    /// Requires every listed authority.
    pub fn require_all(authorities: Vec<Authority>) -> Self {
        Self {
            required: Arc::new(authorities),
            require_all: true,
        }
    }

    /// Requires at least one of the listed authorities.
    pub fn require_any(authorities: Vec<Authority>) -> Self {
        Self {
            required: Arc::new(authorities),
            require_all: false,
        }
    }

    /// Returns `true` if `auth` satisfies the requirement.
    pub fn is_satisfied_by(&self, auth: &Authentication) -> bool {
        if self.require_all {
            auth.has_all_authorities(&self.required)
        } else {
            auth.has_any_authority(&self.required)
        }
    }
}

impl<S> Layer<S> for RequireAuthority {
    type Service = RequireAuthorityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireAuthorityMiddleware {
            inner,
            guard: self.clone(),
        }
    }
}

// =============================================================================
// RequireAuthorityMiddleware
// =============================================================================

/// Middleware enforcing a [`RequireAuthority`] requirement.
#[derive(Clone)]
pub struct RequireAuthorityMiddleware<S> {
    inner: S,
    guard: RequireAuthority,
}

impl<S> Service<Request<Body>> for RequireAuthorityMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let guard = self.guard.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match req.extensions().get::<Authentication>() {
                Some(auth) if guard.is_satisfied_by(auth) => {}
                Some(auth) => {
                    tracing::warn!(
                        subject = %auth.identity(),
                        role = %auth.role(),
                        required = ?guard.required.as_slice(),
                        "Authority denied"
                    );
                    return Ok(ApiError::forbidden("Insufficient authority").into_response());
                }
                None => {
                    tracing::debug!(path = %req.uri().path(), "No authentication found, denying access");
                    return Ok(ApiError::unauthorized("Authentication required").into_response());
                }
            }

            inner.call(req).await
        })
    }
}

/// Builds a [`RequireAuthority`] layer.
///
/// ```rust,ignore
/// let layer = require_authority!(Permission::ManagerRead);
/// let layer = require_authority!(all: Permission::AdminRead, Role::Admin);
/// let layer = require_authority!(any: Role::Manager, Role::Admin);
/// ```
#[macro_export]
macro_rules! require_authority {
    (all: $($authority:expr),+ $(,)?) => {
        $crate::middleware::RequireAuthority::require_all(vec![$($crate::auth::Authority::from($authority)),+])
    };
    (any: $($authority:expr),+ $(,)?) => {
        $crate::middleware::RequireAuthority::require_any(vec![$($crate::auth::Authority::from($authority)),+])
    };
    ($authority:expr) => {
        $crate::middleware::RequireAuthority::require($authority)
    };
}

// =============================================================================
// Tests
// =============================================================================
