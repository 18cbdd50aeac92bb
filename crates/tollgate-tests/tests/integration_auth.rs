// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Auth Integration Tests
//!
//! End-to-end tests that drive issued tokens through an axum router with the
//! authentication layer and authority guards installed.
//!
//! ## Test Categories
//!
//! - `test_flow_*`: Issue, present, expire
//! - `test_revocation_*`: Ledger-driven rejection
//! - `test_guard_*`: 401 versus 403
//! - `test_degraded_*`: Failing collaborators
//! - `test_layer_*`: Middleware behavior

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tollgate_auth::{
    require_authority, AnonymousReason, Auth, AuthLayer, Authentication, ClaimsCodec, JwtConfig,
    MemoryLedger, OptionalAuth, Permission, Principal, RevocationLedger, Role,
};
use tollgate_tests::common::*;
use tower::ServiceExt;

// =============================================================================
// Test Helpers
// =============================================================================

async fn me(Auth(auth): Auth) -> Json<Value> {
    Json(serde_json::json!({
        "identity": auth.identity(),
        "role": auth.role(),
        "authorities": auth.authorities.to_strings(),
    }))
}

async fn reports(Auth(auth): Auth) -> String {
    format!("reports for {}", auth.identity())
}

async fn admin() -> &'static str {
    "admin area"
}

async fn public(OptionalAuth(auth): OptionalAuth) -> String {
    match auth {
        Some(auth) => auth.identity().to_string(),
        None => "anonymous".to_string(),
    }
}

fn app(fixture: &AuthFixture) -> Router {
    Router::new()
        .route("/me", get(me))
        .route(
            "/reports",
            get(reports).layer(require_authority!(Permission::ManagerRead)),
        )
        .route(
            "/admin",
            get(admin).layer(require_authority!(all: Permission::AdminRead, Role::Admin)),
        )
        .route("/public", get(public))
        .layer(AuthLayer::new(fixture.authenticator.clone()))
}

async fn send(app: &Router, path: &str, authorization: Option<&str>) -> Response {
    let mut builder = axum::http::Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = builder.body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn authority_list(body: &Value) -> Vec<String> {
    body["authorities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Issue / Present / Expire
// =============================================================================

#[tokio::test]
async fn test_flow_manager_token_within_and_after_lifetime() {
    init_test_logging();
    let fixture = AuthFixture::with_config(
        test_jwt_config().with_access_ttl(Duration::from_secs(5 * 60)),
    );
    let app = app(&fixture);
    let token = fixture.issue_recorded(&PrincipalFixtures::alice()).await;

    fixture.advance(Duration::from_secs(4 * 60));

    let response = send(&app, "/me", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["identity"], "alice@example.com");
    assert_eq!(body["role"], "MANAGER");
    let authorities = authority_list(&body);
    assert!(authorities.contains(&"MANAGER_READ".to_string()));
    assert!(authorities.contains(&"ROLE_MANAGER".to_string()));
    assert!(!authorities.contains(&"ADMIN_READ".to_string()));

    let response = send(&app, "/reports", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "reports for alice@example.com");

    fixture.advance(Duration::from_secs(2 * 60));

    let response = send(&app, "/reports", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_flow_expiry_boundary_is_inclusive() {
    let fixture = AuthFixture::with_config(test_jwt_config().with_access_ttl(Duration::from_secs(60)));
    let token = fixture.issue_recorded(&PrincipalFixtures::bob()).await;

    fixture.advance(Duration::from_secs(60));
    let outcome = fixture.authenticator.authenticate_header(Some(&bearer(&token))).await;
    assert!(outcome.is_authenticated());

    fixture.advance(Duration::from_secs(1));
    let outcome = fixture.authenticator.authenticate_header(Some(&bearer(&token))).await;
    assert_eq!(outcome.anonymous_reason(), Some(AnonymousReason::Expired));
}

#[tokio::test]
async fn test_flow_unrecorded_token_is_accepted_by_default() {
    let fixture = AuthFixture::new();
    let app = app(&fixture);
    let token = fixture
        .issuer
        .issue_access_token(&PrincipalFixtures::bob(), None)
        .unwrap();

    let response = send(&app, "/me", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_flow_strict_ledger_refuses_unrecorded_token() {
    let fixture = AuthFixture::with_stores(
        Arc::new(PrincipalFixtures::identity_store()),
        Arc::new(MemoryLedger::strict()),
    );
    let unrecorded = fixture
        .issuer
        .issue_access_token(&PrincipalFixtures::bob(), None)
        .unwrap();
    fixture.advance(Duration::from_secs(1));
    let recorded = fixture.issue_recorded(&PrincipalFixtures::bob()).await;
    assert_ne!(unrecorded.value, recorded.value);

    let outcome = fixture.authenticator.authenticate_header(Some(&bearer(&unrecorded))).await;
    assert_eq!(outcome.anonymous_reason(), Some(AnonymousReason::Revoked));

    let outcome = fixture.authenticator.authenticate_header(Some(&bearer(&recorded))).await;
    assert!(outcome.is_authenticated());
}

#[tokio::test]
async fn test_flow_extra_claims_survive_round_trip() {
    let fixture = AuthFixture::new();
    let mut extra = tollgate_auth::ExtraClaims::new();
    extra.insert("tenant".to_string(), Value::String("acme".to_string()));

    let token = fixture
        .issuer
        .issue_access_token(&PrincipalFixtures::alice(), Some(extra))
        .unwrap();
    let claims = fixture.issuer.codec().verify_at(token.as_str(), EPOCH).unwrap();

    assert_eq!(claims.subject(), "alice@example.com");
    assert_eq!(claims.extra("tenant"), Some(&Value::String("acme".to_string())));
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
}

// =============================================================================
// Revocation
// =============================================================================

#[tokio::test]
async fn test_revocation_blocks_next_request() {
    let fixture = AuthFixture::new();
    let app = app(&fixture);
    let token = fixture.issue_recorded(&PrincipalFixtures::alice()).await;

    assert_eq!(send(&app, "/me", Some(&bearer(&token))).await.status(), StatusCode::OK);

    assert!(fixture.ledger.mark_revoked(token.as_str()).await.unwrap());

    assert_eq!(
        send(&app, "/me", Some(&bearer(&token))).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_revocation_logout_everywhere() {
    let fixture = AuthFixture::new();
    let alice = PrincipalFixtures::alice();
    let first = fixture.issue_recorded(&alice).await;
    fixture.advance(Duration::from_secs(1));
    let second = fixture.issue_recorded(&alice).await;
    let bobs = fixture.issue_recorded(&PrincipalFixtures::bob()).await;

    assert_eq!(fixture.ledger.usable_tokens_for(alice.identity()).await.unwrap().len(), 2);
    assert_eq!(fixture.ledger.mark_all_revoked_for(alice.identity()).await.unwrap(), 2);
    assert!(fixture.ledger.usable_tokens_for(alice.identity()).await.unwrap().is_empty());

    for token in [&first, &second] {
        let outcome = fixture.authenticator.authenticate_header(Some(&bearer(token))).await;
        assert_eq!(outcome.anonymous_reason(), Some(AnonymousReason::Revoked));
    }
    let outcome = fixture.authenticator.authenticate_header(Some(&bearer(&bobs))).await;
    assert!(outcome.is_authenticated());
}

#[tokio::test]
async fn test_revocation_visible_across_tasks() {
    let fixture = AuthFixture::new();
    let token = fixture.issue_recorded(&PrincipalFixtures::carol()).await;

    let ledger = fixture.ledger.clone();
    let value = token.value.clone();
    tokio::spawn(async move { ledger.mark_revoked(&value).await.unwrap() })
        .await
        .unwrap();

    let authenticator = fixture.authenticator.clone();
    let header = bearer(&token);
    let outcome = tokio::spawn(async move { authenticator.authenticate_header(Some(&header)).await })
        .await
        .unwrap();
    assert_eq!(outcome.anonymous_reason(), Some(AnonymousReason::Revoked));
}

#[tokio::test]
async fn test_revocation_of_unknown_token_reports_false() {
    let fixture = AuthFixture::new();
    assert!(!fixture.ledger.mark_revoked("never.issued.token").await.unwrap());
}

// =============================================================================
// Authority Guards
// =============================================================================

#[tokio::test]
async fn test_guard_missing_credentials_is_unauthorized() {
    let fixture = AuthFixture::new();
    let app = app(&fixture);

    assert_eq!(send(&app, "/me", None).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(send(&app, "/reports", None).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        send(&app, "/reports", Some("Basic YWxpY2U6c2VjcmV0")).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_guard_missing_authority_is_forbidden() {
    let fixture = AuthFixture::new();
    let app = app(&fixture);
    let bob = fixture.issue_recorded(&PrincipalFixtures::bob()).await;
    let alice = fixture.issue_recorded(&PrincipalFixtures::alice()).await;

    assert_eq!(send(&app, "/reports", Some(&bearer(&bob))).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(send(&app, "/admin", Some(&bearer(&alice))).await.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guard_admin_passes_manager_checks() {
    let fixture = AuthFixture::new();
    let app = app(&fixture);
    let carol = fixture.issue_recorded(&PrincipalFixtures::carol()).await;

    assert_eq!(send(&app, "/reports", Some(&bearer(&carol))).await.status(), StatusCode::OK);
    assert_eq!(send(&app, "/admin", Some(&bearer(&carol))).await.status(), StatusCode::OK);

    let body = body_json(send(&app, "/me", Some(&bearer(&carol))).await).await;
    let authorities = authority_list(&body);
    assert!(authorities.contains(&"ROLE_ADMIN".to_string()));
    assert!(authorities.contains(&"ROLE_MANAGER".to_string()));
}

#[tokio::test]
async fn test_guard_public_route_sees_optional_identity() {
    let fixture = AuthFixture::new();
    let app = app(&fixture);
    let bob = fixture.issue_recorded(&PrincipalFixtures::bob()).await;

    assert_eq!(body_text(send(&app, "/public", None).await).await, "anonymous");
    assert_eq!(
        body_text(send(&app, "/public", Some(&bearer(&bob))).await).await,
        "bob@example.com"
    );
}

// =============================================================================
// Tampering and Foreign Keys
// =============================================================================

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let fixture = AuthFixture::new();
    let app = app(&fixture);
    let token = fixture.issue_recorded(&PrincipalFixtures::alice()).await;

    let idx = token.value.len() - 5;
    let mut bytes = token.value.clone().into_bytes();
    bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).unwrap();

    let response = send(&app, "/me", Some(&format!("Bearer {}", tampered))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_foreign_key_is_rejected() {
    let fixture = AuthFixture::new();
    let foreign = ClaimsCodec::from_config(&JwtConfig::new(OTHER_SECRET)).unwrap();
    let token = foreign
        .encode(
            "alice@example.com",
            &tollgate_auth::ExtraClaims::new(),
            EPOCH,
            EPOCH + 3600,
        )
        .unwrap();

    let outcome = fixture
        .authenticator
        .authenticate_header(Some(&format!("Bearer {}", token)))
        .await;
    assert!(matches!(
        outcome.anonymous_reason(),
        Some(AnonymousReason::InvalidSignature) | Some(AnonymousReason::Malformed)
    ));
}

// =============================================================================
// Degraded Collaborators
// =============================================================================

#[tokio::test]
async fn test_degraded_identity_store_yields_anonymous() {
    init_test_logging();
    let fixture = AuthFixture::with_stores(Arc::new(FailingIdentityStore), Arc::new(MemoryLedger::new()));
    let app = app(&fixture);
    let token = fixture
        .issuer
        .issue_access_token(&PrincipalFixtures::alice(), None)
        .unwrap();

    let outcome = fixture.authenticator.authenticate_header(Some(&bearer(&token))).await;
    assert_eq!(outcome.anonymous_reason(), Some(AnonymousReason::IdentityLookupFailed));
    assert_eq!(send(&app, "/me", Some(&bearer(&token))).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_degraded_ledger_yields_anonymous() {
    let fixture = AuthFixture::with_stores(
        Arc::new(PrincipalFixtures::identity_store()),
        Arc::new(FailingLedger),
    );
    let app = app(&fixture);
    let token = fixture
        .issuer
        .issue_access_token(&PrincipalFixtures::alice(), None)
        .unwrap();

    let outcome = fixture.authenticator.authenticate_header(Some(&bearer(&token))).await;
    assert_eq!(outcome.anonymous_reason(), Some(AnonymousReason::LedgerUnavailable));
    assert_eq!(send(&app, "/public", Some(&bearer(&token))).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_degraded_principal_removed_after_issuance() {
    let identities = Arc::new(PrincipalFixtures::identity_store());
    let fixture = AuthFixture::with_stores(identities.clone(), Arc::new(MemoryLedger::new()));
    let token = fixture.issue_recorded(&PrincipalFixtures::bob()).await;

    identities.remove("bob@example.com");

    let outcome = fixture.authenticator.authenticate_header(Some(&bearer(&token))).await;
    assert_eq!(outcome.anonymous_reason(), Some(AnonymousReason::PrincipalNotFound));
}

// =============================================================================
// Middleware Behavior
// =============================================================================

async fn preauthenticate(mut req: Request, next: Next) -> Response {
    req.extensions_mut()
        .insert(Authentication::new(Principal::new("system@internal", Role::Admin)));
    next.run(req).await
}

#[tokio::test]
async fn test_layer_keeps_existing_authentication() {
    let counting = Arc::new(CountingIdentityStore::new(PrincipalFixtures::identity_store()));
    let fixture = AuthFixture::with_stores(counting.clone(), Arc::new(MemoryLedger::new()));
    let token = fixture.issue_recorded(&PrincipalFixtures::alice()).await;

    let app = Router::new()
        .route("/me", get(me))
        .layer(AuthLayer::new(fixture.authenticator.clone()))
        .layer(middleware::from_fn(preauthenticate));

    let response = send(&app, "/me", Some(&bearer(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["identity"], "system@internal");
    assert_eq!(counting.lookups(), 0);
}

#[tokio::test]
async fn test_layer_records_anonymous_reason() {
    async fn reason(req: Request) -> impl IntoResponse {
        req.extensions()
            .get::<AnonymousReason>()
            .map(|r| r.as_str().to_string())
            .unwrap_or_default()
    }

    let fixture = AuthFixture::new();
    let app = Router::new()
        .route("/reason", get(reason))
        .layer(AuthLayer::new(fixture.authenticator.clone()));

    assert_eq!(body_text(send(&app, "/reason", None).await).await, "missing_credentials");
    assert_eq!(
        body_text(send(&app, "/reason", Some("Bearer not-a-token")).await).await,
        "malformed"
    );
}

#[tokio::test]
async fn test_layer_concurrent_requests() {
    let fixture = AuthFixture::new();
    let app = app(&fixture);
    let alice = fixture.issue_recorded(&PrincipalFixtures::alice()).await;
    let bob = fixture.issue_recorded(&PrincipalFixtures::bob()).await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = app.clone();
        let header = if i % 2 == 0 { bearer(&alice) } else { bearer(&bob) };
        handles.push(tokio::spawn(async move {
            let status = send(&app, "/reports", Some(&header)).await.status();
            (i, status)
        }));
    }

    for handle in handles {
        let (i, status) = handle.await.unwrap();
        let expected = if i % 2 == 0 { StatusCode::OK } else { StatusCode::FORBIDDEN };
        assert_eq!(status, expected);
    }
}
