//! # Integration Tests for regatta-api
//!
//! Drives the full router with an in-memory document store and a static
//! credential table: session enforcement, owner isolation, document CRUD,
//! validation, preview/export, the rule catalog, and the OIDC login flow
//! against a mock provider.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use regatta_api::gateway::DocumentGateway;
use regatta_api::identity::IdentityGateway;
use regatta_api::state::{AppConfig, AppState};
use regatta_core::ExternalIdentity;
use regatta_oidc::{OidcClient, OidcConfig, SessionIdentity};

const TOKEN_A: &str = "token-eastern";
const TOKEN_B: &str = "token-western";

fn session(org: &str, name: &str) -> SessionIdentity {
    SessionIdentity {
        user_id: format!("user-{org}"),
        external_identity: ExternalIdentity::new(org).unwrap(),
        display_name: name.to_string(),
        email: None,
        logo_url: None,
    }
}

/// Helper: the app with two race committees and an empty document store.
fn test_app() -> axum::Router {
    let identity = IdentityGateway::fixed([
        (TOKEN_A.to_string(), session("org_eastern", "Eastern YC")),
        (TOKEN_B.to_string(), session("org_western", "Western YC")),
    ]);
    regatta_api::app(AppState::new(
        DocumentGateway::in_memory(),
        identity,
        AppConfig::default(),
    ))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Helper: send a request and return status plus JSON body (Null if empty).
async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

async fn create(app: &axum::Router, token: &str, body: Value) -> Value {
    let (status, value) = send(app, request("POST", "/v1/documents", Some(token), Some(body))).await;
    assert_eq!(status, StatusCode::CREATED, "{value}");
    value["document"].clone()
}

// -- Health & public endpoints ------------------------------------------------

#[tokio::test]
async fn liveness_and_readiness() {
    let app = test_app();
    let (status, body) = send(&app, request("GET", "/health/liveness", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));

    let (status, body) = send(&app, request("GET", "/health/readiness", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ready".into()));
}

#[tokio::test]
async fn config_is_public() {
    let (status, body) = send(&test_app(), request("GET", "/v1/config", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appName"], "regatta.club Document Generator");
    assert!(body["suggestedCustomFields"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "Weather Information"));
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let (status, body) = send(&test_app(), request("GET", "/openapi.json", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/documents"].is_object());
}

#[tokio::test]
async fn auth_status_reports_session() {
    let app = test_app();
    let (_, anonymous) = send(&app, request("GET", "/v1/auth/status", None, None)).await;
    assert_eq!(anonymous["authenticated"], false);
    assert!(anonymous.get("user").is_none());

    let (_, signed_in) = send(&app, request("GET", "/v1/auth/status", Some(TOKEN_A), None)).await;
    assert_eq!(signed_in["authenticated"], true);
    assert_eq!(signed_in["user"]["displayName"], "Eastern YC");

    let (status, bogus) = send(&app, request("GET", "/v1/auth/status", Some("bogus"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bogus["authenticated"], false);
}

#[tokio::test]
async fn login_without_provider_is_unavailable() {
    let (status, body) = send(&test_app(), request("GET", "/v1/auth/login", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn logout_clears_cookie() {
    let response = test_app()
        .oneshot(request("GET", "/v1/auth/logout", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session_token="));
}

// -- Session enforcement ------------------------------------------------------

#[tokio::test]
async fn protected_routes_require_session() {
    let app = test_app();
    for (method, uri) in [
        ("GET", "/v1/documents"),
        ("POST", "/v1/documents"),
        ("GET", "/v1/rules"),
        ("POST", "/v1/preview"),
    ] {
        let (status, body) = send(&app, request(method, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn rejected_credential_never_reaches_storage() {
    let app = test_app();
    let (status, _) = send(
        &app,
        request("POST", "/v1/documents", Some("forged"), Some(json!({"title": "Sneaky"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, listing) = send(&app, request("GET", "/v1/documents", Some(TOKEN_A), None)).await;
    assert_eq!(listing["documents"].as_array().unwrap().len(), 0);
    let (_, listing) = send(&app, request("GET", "/v1/documents", Some(TOKEN_B), None)).await;
    assert_eq!(listing["documents"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let req = Request::builder()
        .uri("/v1/documents")
        .header(header::COOKIE, format!("session_token={TOKEN_A}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&test_app(), req).await;
    assert_eq!(status, StatusCode::OK);
}

// -- Document CRUD ------------------------------------------------------------

#[tokio::test]
async fn document_lifecycle() {
    let app = test_app();
    let doc = create(
        &app,
        TOKEN_A,
        json!({
            "title": "Wednesday Night Series",
            "eventData": {"venue": "Marblehead Harbor"},
            "selectedRules": ["rule-44", "rule-1"],
            "modifiedRules": {"rule-44": "One-Turn Penalty applies."}
        }),
    )
    .await;
    let id = doc["id"].as_str().unwrap().to_string();
    assert_eq!(doc["selectedRules"], json!(["rule-1", "rule-44"]));
    assert!(doc.get("createdAt").is_some());

    let (status, fetched) = send(&app, request("GET", &format!("/v1/documents/{id}"), Some(TOKEN_A), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["document"]["title"], "Wednesday Night Series");

    let (status, updated) = send(
        &app,
        request(
            "PUT",
            &format!("/v1/documents/{id}"),
            Some(TOKEN_A),
            Some(json!({"title": "Thursday Night Series", "selectedRules": ["rule-1"]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["document"]["title"], "Thursday Night Series");
    assert_eq!(updated["document"]["modifiedRules"], json!({}));
    assert_eq!(updated["document"]["createdAt"], doc["createdAt"]);

    let (status, deleted) = send(&app, request("DELETE", &format!("/v1/documents/{id}"), Some(TOKEN_A), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], true);

    let (status, _) = send(&app, request("GET", &format!("/v1/documents/{id}"), Some(TOKEN_A), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_most_recently_updated_first() {
    let app = test_app();
    let first = create(&app, TOKEN_A, json!({"title": "First"})).await;
    create(&app, TOKEN_A, json!({"title": "Second"})).await;
    let id = first["id"].as_str().unwrap();
    send(
        &app,
        request("PUT", &format!("/v1/documents/{id}"), Some(TOKEN_A), Some(json!({"title": "First again"}))),
    )
    .await;

    let (_, listing) = send(&app, request("GET", "/v1/documents", Some(TOKEN_A), None)).await;
    let titles: Vec<&str> = listing["documents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First again", "Second"]);
}

#[tokio::test]
async fn other_owners_documents_are_not_found() {
    let app = test_app();
    let doc = create(&app, TOKEN_A, json!({"title": "Eastern Regatta"})).await;
    let uri = format!("/v1/documents/{}", doc["id"].as_str().unwrap());

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({"title": "Hijacked"}))),
        ("DELETE", None),
    ] {
        let (status, err) = send(&app, request(method, &uri, Some(TOKEN_B), body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(err["error"]["code"], "NOT_FOUND");
    }
    let (status, _) = send(&app, request("GET", &format!("{uri}/preview"), Some(TOKEN_B), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A random id gives the same answer as someone else's id.
    let (status, _) = send(
        &app,
        request("GET", &format!("/v1/documents/{}", uuid::Uuid::new_v4()), Some(TOKEN_B), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, still_there) = send(&app, request("GET", &uri, Some(TOKEN_A), None)).await;
    assert_eq!(still_there["document"]["title"], "Eastern Regatta");
}

#[tokio::test]
async fn malformed_document_id_is_json_not_found() {
    let app = test_app();
    for (method, uri, body) in [
        ("GET", "/v1/documents/123", None),
        ("PUT", "/v1/documents/not-a-uuid", Some(json!({"title": "T"}))),
        ("DELETE", "/v1/documents/123", None),
        ("GET", "/v1/documents/123/preview", None),
        ("GET", "/v1/documents/123/export/nor", None),
    ] {
        let response = app
            .clone()
            .oneshot(request(method, uri, Some(TOKEN_A), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let err: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(err["error"]["code"], "NOT_FOUND");
    }
}

// -- Validation ---------------------------------------------------------------

#[tokio::test]
async fn invalid_content_is_rejected_before_storage() {
    let app = test_app();
    for body in [
        json!({"title": "   "}),
        json!({"title": "T", "selectedRules": ["rule-999"]}),
        json!({"title": "T", "selectedRules": ["rule-2"], "modifiedRules": {"rule-2": "nope"}}),
        json!({"title": "T", "modifiedRules": {"rule-44": "not selected"}}),
        json!({"title": "T", "customFields": {" ": "nameless"}}),
        json!({
            "title": "T",
            "fleetProvisions": [{"id": "p1", "fleetId": "ghost", "content": "x", "section": "nor"}]
        }),
    ] {
        let (status, err) = send(&app, request("POST", "/v1/documents", Some(TOKEN_A), Some(body.clone()))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    }

    let (_, listing) = send(&app, request("GET", "/v1/documents", Some(TOKEN_A), None)).await;
    assert!(listing["documents"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/documents")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN_A}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, err) = send(&test_app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn failed_update_leaves_document_untouched() {
    let app = test_app();
    let doc = create(&app, TOKEN_A, json!({"title": "Keep Me", "selectedRules": ["rule-1"]})).await;
    let uri = format!("/v1/documents/{}", doc["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(TOKEN_A), Some(json!({"title": "Broken", "selectedRules": ["nope"]}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, fetched) = send(&app, request("GET", &uri, Some(TOKEN_A), None)).await;
    assert_eq!(fetched["document"]["title"], "Keep Me");
    assert_eq!(fetched["document"]["selectedRules"], json!(["rule-1"]));
}

// -- Preview & export ---------------------------------------------------------

#[tokio::test]
async fn preview_applies_overrides_and_sections() {
    let app = test_app();
    let doc = create(
        &app,
        TOKEN_A,
        json!({
            "title": "Heavy Air Regatta",
            "selectedRules": ["rule-1", "rule-30.1"],
            "modifiedRules": {"rule-30.1": "Custom I-flag text"},
            "fleets": [{"id": "fleet-1", "name": "PHRF", "color": "#3b82f6"}],
            "fleetProvisions": [
                {"id": "p1", "fleetId": "fleet-1", "content": "No spinnakers over 30kt", "section": "nor"}
            ]
        }),
    )
    .await;
    let uri = format!("/v1/documents/{}/preview", doc["id"].as_str().unwrap());
    let (status, preview) = send(&app, request("GET", &uri, Some(TOKEN_A), None)).await;
    assert_eq!(status, StatusCode::OK);

    let si = preview["si"].to_string();
    let nor = preview["nor"].to_string();
    assert!(si.contains("Custom I-flag text"));
    assert!(si.contains("Boats shall comply with RRS 1 (Safety)."));
    assert!(!nor.contains("Custom I-flag text"));
    assert!(nor.contains("No spinnakers over 30kt"));
    assert!(!si.contains("No spinnakers over 30kt"));

    let rrs = &preview["coverage"][0];
    assert_eq!(rrs["category"], "rrs");
    assert_eq!(rrs["selected"], 2);
}

#[tokio::test]
async fn export_returns_markdown() {
    let app = test_app();
    let doc = create(
        &app,
        TOKEN_A,
        json!({"title": "Fall Classic", "eventData": {"vhfChannel": "72"}, "selectedRules": ["rule-1"]}),
    )
    .await;
    let id = doc["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/v1/documents/{id}/export/si"), Some(TOKEN_A), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/markdown; charset=utf-8"
    );
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("fall-classic-si.md"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let markdown = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(markdown.starts_with("# Fall Classic\n"));
    assert!(markdown.contains("Sailing Instructions"));
    assert!(markdown.contains("**VHF Channel:** 72"));

    let (status, _) = send(
        &app,
        request("GET", &format!("/v1/documents/{id}/export/pdf"), Some(TOKEN_A), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsaved_payload_preview_stores_nothing() {
    let app = test_app();
    let (status, preview) = send(
        &app,
        request(
            "POST",
            "/v1/preview",
            Some(TOKEN_A),
            Some(json!({"title": "Draft", "customFields": {"Parking": "Lot B"}})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(preview["nor"].to_string().contains("Lot B"));
    assert!(preview["si"].to_string().contains("Lot B"));

    let (_, listing) = send(&app, request("GET", "/v1/documents", Some(TOKEN_A), None)).await;
    assert!(listing["documents"].as_array().unwrap().is_empty());
}

// -- Rule catalog -------------------------------------------------------------

#[tokio::test]
async fn rules_catalog_filters() {
    let app = test_app();
    let (status, all) = send(&app, request("GET", "/v1/rules", Some(TOKEN_A), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["rules"].as_array().unwrap().len(), 28);
    assert_eq!(all["rules"][0]["id"], "rule-1");

    let (_, appendices) = send(&app, request("GET", "/v1/rules?category=appendix", Some(TOKEN_A), None)).await;
    assert!(appendices["rules"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["category"] == "appendix"));

    let (_, si_rules) = send(&app, request("GET", "/v1/rules?section=si", Some(TOKEN_A), None)).await;
    assert!(si_rules["rules"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["section"] != "nor"));

    let (status, _) = send(&app, request("GET", "/v1/rules?category=colregs", Some(TOKEN_A), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn rule_lookup_and_suggestions() {
    let app = test_app();
    let (status, rule) = send(&app, request("GET", "/v1/rules/rule-30.1", Some(TOKEN_A), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rule["rule"]["canModify"], true);

    let (status, _) = send(&app, request("GET", "/v1/rules/rule-0", Some(TOKEN_A), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, suggestions) = send(&app, request("GET", "/v1/rules/rule-44/suggestions", Some(TOKEN_A), None)).await;
    assert_eq!(suggestions["ruleId"], "rule-44");
    assert!(suggestions["suggestions"][0]["text"]
        .as_str()
        .unwrap()
        .contains("One-Turn Penalty"));

    let (_, fixed) = send(&app, request("GET", "/v1/rules/rule-2/suggestions", Some(TOKEN_A), None)).await;
    assert!(fixed["suggestions"].as_array().unwrap().is_empty());
}

// -- OIDC login flow ----------------------------------------------------------

fn oidc_app(mock_server: &MockServer) -> axum::Router {
    let config = OidcConfig::local_mock(&mock_server.uri()).unwrap();
    let identity = IdentityGateway::Oidc(OidcClient::new(config).unwrap());
    regatta_api::app(AppState::new(
        DocumentGateway::in_memory(),
        identity,
        AppConfig {
            session_cookie_secure: false,
            ..AppConfig::default()
        },
    ))
}

fn cookie_value<'a>(set_cookies: &'a [String], name: &str) -> Option<&'a str> {
    set_cookies.iter().find_map(|c| {
        c.strip_prefix(&format!("{name}="))
            .map(|rest| rest.split(';').next().unwrap_or(""))
    })
}

#[tokio::test]
async fn login_callback_sets_session_cookie() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-live",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "user-9",
            "org": "org_harbor",
            "org_name": "Harbor Sailing Club"
        })))
        .mount(&mock_server)
        .await;

    let app = oidc_app(&mock_server);

    let login = app
        .clone()
        .oneshot(request("GET", "/v1/auth/login", None, None))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::FOUND);
    let location = login.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with(&format!("{}/authorize?", mock_server.uri())));
    let set_cookies: Vec<String> = login
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let nonce = cookie_value(&set_cookies, "login_state").unwrap().to_string();
    assert!(location.contains(&format!("state={nonce}")));

    let callback = Request::builder()
        .uri(format!("/v1/auth/callback?code=abc&state={nonce}"))
        .header(header::COOKIE, format!("login_state={nonce}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(callback).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let set_cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookie_value(&set_cookies, "session_token"), Some("at-live"));
    let session_cookie = set_cookies
        .iter()
        .find(|c| c.starts_with("session_token="))
        .unwrap();
    assert!(session_cookie.contains("HttpOnly"));
    assert!(session_cookie.contains("SameSite=Lax"));

    // The new cookie authenticates API calls.
    let req = Request::builder()
        .uri("/v1/documents")
        .header(header::COOKIE, "session_token=at-live")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn callback_with_mismatched_state_is_refused() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "x"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let callback = Request::builder()
        .uri("/v1/auth/callback?code=abc&state=attacker")
        .header(header::COOKIE, "login_state=expected")
        .body(Body::empty())
        .unwrap();
    let response = oidc_app(&mock_server).oneshot(callback).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/?error=invalid_state");
}

#[tokio::test]
async fn callback_with_provider_error_redirects() {
    let mock_server = MockServer::start().await;
    let response = oidc_app(&mock_server)
        .oneshot(request("GET", "/v1/auth/callback?error=access_denied", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/?error=access_denied");
}

async fn callback_location(mock_server: &MockServer) -> String {
    let callback = Request::builder()
        .uri("/v1/auth/callback?code=abc&state=n1")
        .header(header::COOKIE, "login_state=n1")
        .body(Body::empty())
        .unwrap();
    let response = oidc_app(mock_server).oneshot(callback).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

async fn mount_token(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "at-1"})))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn callback_without_committee_claim_reports_it() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sub": "user-9"})))
        .mount(&mock_server)
        .await;
    assert_eq!(callback_location(&mock_server).await, "/?error=no_race_committee");
}

#[tokio::test]
async fn callback_during_provider_outage_reports_outage() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;
    assert_eq!(callback_location(&mock_server).await, "/?error=provider_unavailable");
}

#[tokio::test]
async fn provider_outage_is_internal_error_not_401() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (status, body) = send(
        &oidc_app(&mock_server),
        request("GET", "/v1/documents", Some("any"), None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "An internal error occurred");
}
