//! Login, refresh-cookie round trip, and logout against a mock backend.

mod common;

use common::Harness;
use crm_client::auth::{AuthService, LoginCredentials, SessionRole};
use crm_client::http::ApiRequest;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn refresh_uses_cookie_set_at_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshToken=R1; Path=/; HttpOnly")
                .set_body_json(json!({ "accessToken": "T1" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("cookie", "refreshToken=R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "T2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(498))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "7", "name": "Anna", "role": "teamlead" })),
        )
        .mount(&server)
        .await;

    let harness = Harness::new(&server, None);
    let auth = AuthService::new(harness.client.clone());
    auth.login(&LoginCredentials::new("anna@corp.io", "pw"))
        .await
        .unwrap();
    assert_eq!(harness.access_token().as_deref(), Some("T1"));

    let me = auth.profile().await.unwrap();
    assert_eq!(me.name, "Anna");
    assert_eq!(me.role, SessionRole::Teamlead);
    assert_eq!(harness.access_token().as_deref(), Some("T2"));
}

#[tokio::test]
async fn rejected_login_leaves_session_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let harness = Harness::new(&server, None);
    let err = AuthService::new(harness.client.clone())
        .login(&LoginCredentials::new("anna@corp.io", "nope"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Invalid credentials");
    assert!(harness.navigator.redirects().is_empty());
}

#[tokio::test]
async fn logout_then_requests_go_out_anonymous() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/company/structure"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let harness = Harness::new(&server, Some("T1"));
    let auth = AuthService::new(harness.client.clone());
    auth.logout().await.unwrap();
    assert!(!auth.is_authenticated().unwrap());

    harness
        .client
        .execute(ApiRequest::get("company/structure"))
        .await
        .unwrap();
    let received = server.received_requests().await.unwrap();
    let last = received.last().unwrap();
    assert_eq!(last.url.path(), "/company/structure");
    assert!(last.headers.get("authorization").is_none());
}
