//! End-to-end signup, login, dashboard and logout flows.
//!
//! Each test starts its own server with empty in-memory stores.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use latchkey_integration_tests::{TestApp, location, session_cookie};
use reqwest::{StatusCode, header};

const SIGNUP_OK: &str = "Account created successfully. Please log in.";
const BAD_LOGIN: &str = "Invalid username or password.";

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_login_dashboard() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let resp = app.signup(&client, "alice", "hunter2").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let (_, home) = app.get_page(&client, "/").await;
    assert!(home.contains(SIGNUP_OK));

    let resp = app.login(&client, "alice", "hunter2").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/dashboard"));

    let (status, dashboard) = app.get_page(&client, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(dashboard.contains("alice"));
}

#[tokio::test]
async fn test_duplicate_signup_keeps_original_password() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    app.signup(&client, "alice", "hunter2").await;
    let resp = app.signup(&client, "alice", "other-password").await;
    assert_eq!(location(&resp), Some("/signup"));

    let (_, page) = app.get_page(&client, "/signup").await;
    assert!(page.contains("Username already exists"));
    assert_eq!(app.users.len().await, 1);

    let resp = app.login(&client, "alice", "other-password").await;
    assert_eq!(location(&resp), Some("/"));

    let resp = app.login(&client, "alice", "hunter2").await;
    assert_eq!(location(&resp), Some("/dashboard"));
}

#[tokio::test]
async fn test_signup_with_missing_fields() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    for form in [
        vec![("username", "alice"), ("password", "")],
        vec![("username", ""), ("password", "hunter2")],
        vec![("username", "alice")],
        vec![],
    ] {
        let resp = app.post_form(&client, "/signup", &form).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/signup"));

        let (_, page) = app.get_page(&client, "/signup").await;
        assert!(page.contains("Please fill all fields"));
    }

    assert!(app.users.is_empty().await);
}

#[tokio::test]
async fn test_signup_rejects_overlong_username() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let resp = app.signup(&client, &"a".repeat(65), "hunter2").await;
    assert_eq!(location(&resp), Some("/signup"));

    let (_, page) = app.get_page(&client, "/signup").await;
    assert!(page.contains("Username must be at most 64 characters"));
    assert!(app.users.is_empty().await);
}

#[tokio::test]
async fn test_concurrent_signups_create_one_account() {
    let app = TestApp::spawn().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let url = app.url("/signup");
        let password = format!("pw-{i}");
        handles.push(tokio::spawn(async move {
            TestApp::client()
                .post(url)
                .form(&[("username", "racer"), ("password", password.as_str())])
                .send()
                .await
                .unwrap()
        }));
    }

    let mut created = 0;
    for handle in handles {
        let resp = handle.await.unwrap();
        if location(&resp) == Some("/") {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(app.users.len().await, 1);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::spawn().await;
    let setup = TestApp::client();
    app.signup(&setup, "alice", "hunter2").await;

    let mut pages = Vec::new();
    for (username, password) in [("alice", "wrong"), ("nobody", "hunter2")] {
        let client = TestApp::client();
        let resp = app.login(&client, username, password).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/"));

        let (_, home) = app.get_page(&client, "/").await;
        assert!(home.contains(BAD_LOGIN));
        pages.push(home);
    }

    assert_eq!(pages[0], pages[1]);
}

#[tokio::test]
async fn test_login_with_empty_fields() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let resp = app.post_form(&client, "/login", &[("username", "")]).await;
    assert_eq!(location(&resp), Some("/"));

    let (_, home) = app.get_page(&client, "/").await;
    assert!(home.contains(BAD_LOGIN));
}

#[tokio::test]
async fn test_login_cycles_session_id() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();
    app.signup(&client, "alice", "hunter2").await;

    // The duplicate-signup flash writes to the pre-login session
    let before = app.signup(&client, "alice", "hunter2").await;
    let before = session_cookie(&before);

    let after = app.login(&client, "alice", "hunter2").await;
    let after = session_cookie(&after).expect("login sets the session cookie");

    assert_ne!(before, Some(after));
}

// ============================================================================
// Dashboard guard & logout
// ============================================================================

#[tokio::test]
async fn test_dashboard_requires_login() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let resp = client.get(app.url("/dashboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
    let body = resp.text().await.unwrap();
    assert!(!body.contains("Dashboard"));

    let (_, home) = app.get_page(&client, "/").await;
    assert!(home.contains("Please log in first"));
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();
    app.signup(&client, "alice", "hunter2").await;

    let resp = app.login(&client, "alice", "hunter2").await;
    let cookie = session_cookie(&resp).unwrap();

    // The raw cookie works until logout
    let replay = TestApp::bare_client();
    let resp = replay
        .get(app.url("/dashboard"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.post(app.url("/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let (status, _) = app.get_page(&client, "/dashboard").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let resp = replay
        .get(app.url("/dashboard"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_logout_via_get() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();
    app.signup(&client, "alice", "hunter2").await;
    app.login(&client, "alice", "hunter2").await;

    let resp = client.get(app.url("/logout")).send().await.unwrap();
    assert_eq!(location(&resp), Some("/"));

    let (status, _) = app.get_page(&client, "/dashboard").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let resp = client.post(app.url("/logout")).send().await.unwrap();
    assert_eq!(location(&resp), Some("/"));
}

// ============================================================================
// Flash messages
// ============================================================================

#[tokio::test]
async fn test_flash_is_shown_exactly_once() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    app.login(&client, "nobody", "pw").await;

    let (_, first) = app.get_page(&client, "/").await;
    let (_, second) = app.get_page(&client, "/").await;

    assert_eq!(first.matches(BAD_LOGIN).count(), 1);
    assert!(!second.contains(BAD_LOGIN));
}

#[tokio::test]
async fn test_flash_is_per_session() {
    let app = TestApp::spawn().await;
    let alice = TestApp::client();
    let bob = TestApp::client();

    app.login(&alice, "nobody", "pw").await;

    let (_, bob_home) = app.get_page(&bob, "/").await;
    assert!(!bob_home.contains(BAD_LOGIN));

    let (_, alice_home) = app.get_page(&alice, "/").await;
    assert!(alice_home.contains(BAD_LOGIN));
}

// ============================================================================
// Backend failures
// ============================================================================

#[tokio::test]
async fn test_signup_when_account_store_is_down() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();
    app.users.set_down(true);

    let resp = app.signup(&client, "alice", "hunter2").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/signup"));

    let (status, page) = app.get_page(&client, "/signup").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Error creating account"));

    app.users.set_down(false);
    assert!(app.users.is_empty().await);
}

#[tokio::test]
async fn test_login_when_account_store_is_down() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();
    app.signup(&client, "alice", "hunter2").await;
    app.users.set_down(true);

    let resp = app.login(&client, "alice", "hunter2").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let (_, home) = app.get_page(&client, "/").await;
    assert!(home.contains("Something went wrong"));
    assert!(!home.contains(BAD_LOGIN));

    let (status, _) = app.get_page(&client, "/dashboard").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_readiness_reports_unreachable_store() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();
    app.users.set_down(true);

    let (status, _) = app.get_page(&client, "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.get_page(&client, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_failed_logout_leaves_user_on_dashboard() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();
    app.signup(&client, "alice", "hunter2").await;
    app.login(&client, "alice", "hunter2").await;
    app.sessions.set_fail_deletes(true);

    let resp = client.get(app.url("/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/dashboard"));

    let (status, dashboard) = app.get_page(&client, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(dashboard.contains("alice"));

    // Retry once the store recovers
    app.sessions.set_fail_deletes(false);
    let resp = client.post(app.url("/logout")).send().await.unwrap();
    assert_eq!(location(&resp), Some("/"));

    let (status, _) = app.get_page(&client, "/dashboard").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

// ============================================================================
// Ambient endpoints
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let (status, body) = app.get_page(&client, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = app.get_page(&client, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = TestApp::spawn().await;
    let resp = TestApp::client().get(app.url("/")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(resp.headers().contains_key(header::CONTENT_SECURITY_POLICY));
}

#[tokio::test]
async fn test_static_stylesheet_is_served() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let (status, _) = app.get_page(&client, "/static/css/main.css").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get_page(&client, "/static/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
