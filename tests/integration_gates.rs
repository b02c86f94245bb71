mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use common::{PASSWORD, body_json, get_request, json_request, seed_identity, setup_test_app};
use hostelhub_auth::TokenIssuer;
use hostelhub_config::JwtConfig;
use hostelhub_core::Role;
use hostelhub_db::IdentityStore;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_no_token_is_not_logged_in() {
    let app = setup_test_app();

    let response = app.send(get_request("/api/auth/me", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "You are not logged in");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_not_logged_in() {
    let app = setup_test_app();
    let request = Request::builder()
        .uri("/api/auth/me")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "You are not logged in");
}

#[tokio::test]
async fn test_garbage_token_is_not_authenticated() {
    let app = setup_test_app();

    let response = app
        .send(get_request("/api/auth/me", Some("not.a.token")))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Not authenticated");
}

#[tokio::test]
async fn test_expired_token_is_not_authenticated() {
    let app = setup_test_app();
    let staff = seed_identity(&app.store, "STAFF001", Role::Staff).await;

    let issued = app
        .state
        .tokens
        .issue_with_ttl(
            staff.id,
            staff.role,
            Duration::seconds(60),
            Utc::now() - Duration::seconds(120),
        )
        .unwrap();

    let response = app
        .send(get_request("/api/auth/me", Some(&issued.token)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Not authenticated");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_not_authenticated() {
    let app = setup_test_app();
    let admin = seed_identity(&app.store, "ADMIN01", Role::Admin).await;

    let foreign = TokenIssuer::new(
        &JwtConfig::new("another-secret-key-that-is-also-32-chars", 3600).unwrap(),
    );
    let issued = foreign.issue(admin.id, admin.role).unwrap();

    let response = app
        .send(get_request("/api/identities", Some(&issued.token)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Not authenticated");
}

#[tokio::test]
async fn test_token_for_unknown_identity() {
    let app = setup_test_app();
    let issued = app.state.tokens.issue(Uuid::new_v4(), Role::Admin).unwrap();

    let response = app
        .send(get_request("/api/auth/me", Some(&issued.token)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "User no longer exists");
}

#[tokio::test]
async fn test_deactivation_invalidates_existing_token() {
    let app = setup_test_app();
    let admin = seed_identity(&app.store, "ADMIN01", Role::Admin).await;
    let student = seed_identity(&app.store, "STU001", Role::Student).await;

    let admin_token = app.login_token("ADMIN01", PASSWORD).await;
    let student_token = app.login_token("STU001", PASSWORD).await;

    let response = app
        .send(get_request("/api/auth/me", Some(&student_token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(json_request(
            "POST",
            &format!("/api/identities/{}/deactivate", student.id),
            Some(&admin_token),
            json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(get_request("/api/auth/me", Some(&student_token)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "User no longer exists");

    assert!(app.store.find_by_id(admin.id).await.unwrap().unwrap().is_active);
}

#[tokio::test]
async fn test_student_cannot_reach_admin_routes() {
    let app = setup_test_app();
    let student = seed_identity(&app.store, "STU001", Role::Student).await;
    let token = app.login_token("STU001", PASSWORD).await;

    let response = app.send(get_request("/api/identities", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Permission denied");

    let response = app
        .send(json_request(
            "POST",
            "/api/identities",
            Some(&token),
            json!({
                "name": "Sneaky",
                "handle": "STU999",
                "password": PASSWORD,
                "role": "admin"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.store.find_by_handle("STU999").await.unwrap().is_none());

    let response = app
        .send(json_request(
            "PUT",
            &format!("/api/identities/{}/password", student.id),
            Some(&token),
            json!({ "new_password": "N3wPassw0rd!" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_staff_reads_but_cannot_write() {
    let app = setup_test_app();
    let student = seed_identity(&app.store, "STU001", Role::Student).await;
    seed_identity(&app.store, "STAFF001", Role::Staff).await;
    let token = app.login_token("STAFF001", PASSWORD).await;

    let response = app.send(get_request("/api/identities", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(get_request(
            &format!("/api/identities/{}", student.id),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(json_request(
            "PATCH",
            &format!("/api/identities/{}", student.id),
            Some(&token),
            json!({ "name": "Renamed" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(json_request(
            "POST",
            &format!("/api/identities/{}/deactivate", student.id),
            Some(&token),
            json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_token_checked_before_role() {
    let app = setup_test_app();

    let response = app.send(get_request("/api/identities", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "You are not logged in");
}

#[tokio::test]
async fn test_gate_store_outage_is_503() {
    let app = setup_test_app();
    seed_identity(&app.store, "STAFF001", Role::Staff).await;
    let token = app.login_token("STAFF001", PASSWORD).await;
    app.store.set_unavailable(true);

    let response = app.send(get_request("/api/auth/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
