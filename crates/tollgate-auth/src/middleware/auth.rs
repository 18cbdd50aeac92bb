// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token authentication middleware.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request},
    response::Response,
};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::auth::{AuthOutcome, Authentication, Authenticator};

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer token authentication.
///
/// The wrapped service always receives the request. On success an
/// [`Authentication`] is inserted into the request extensions; otherwise the
/// [`AnonymousReason`](crate::auth::AnonymousReason) is inserted instead and
/// access decisions are left to the route.
#[derive(Clone)]
pub struct AuthLayer {
    authenticator: Arc<Authenticator>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            authenticator: self.authenticator.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    authenticator: Arc<Authenticator>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // An earlier stage already established the principal
            if let Some(existing) = req.extensions().get::<Authentication>() {
                tracing::trace!(subject = %existing.identity(), "Already authenticated, skipping");
                return inner.call(req).await;
            }

            let header = extract_authorization(&req);
            let outcome = authenticator.authenticate_header(header.as_deref()).await;

            match outcome {
                AuthOutcome::Authenticated(auth) => {
                    let mut auth = auth.with_request_id(Uuid::now_v7());
                    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
                        auth = auth.with_client_ip(addr.ip());
                    }
                    req.extensions_mut().insert(auth);
                }
                AuthOutcome::Anonymous(reason) => {
                    req.extensions_mut().insert(reason);
                }
            }

            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Returns the `Authorization` header value, if it is valid text.
fn extract_authorization<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

// =============================================================================
// Tests
// =============================================================================
