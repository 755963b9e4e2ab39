//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, test_config, TestServer,
};
use reqwest::StatusCode;

/// Register and activate an account
async fn registered_user(server: &TestServer, request: &RegisterRequest) -> UserResponse {
    let response = server.post("/auth/register", request).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .get(&format!("/auth/activate/{}", user.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    user
}

async fn logged_in(server: &TestServer, request: &RegisterRequest) -> LoginResponse {
    let response = server
        .post("/auth/login", &LoginRequest::from_register(request))
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_root("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_root("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Registration and Activation
// ============================================================================

#[tokio::test]
async fn test_register_creates_disabled_user() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(user.email, request.email);
    assert_eq!(user.username, request.username);
    assert_eq!(user.name, "Test User");
    assert!(!user.enabled);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/auth/register", &request).await.unwrap();

    let duplicate = RegisterRequest {
        username: None,
        ..request.clone()
    };
    let response = server.post("/auth/register", &duplicate).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.tag, "CONFLICT");
}

#[tokio::test]
async fn test_register_invalid_body() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest {
        email: "not-an-email".to_string(),
        ..RegisterRequest::unique()
    };

    let response = server.post("/auth/register", &request).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(body.tag, "VALIDATION_ERROR");
    assert!(body.fields.iter().any(|f| f.field == "email"));
}

#[tokio::test]
async fn test_malformed_json() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.post_raw("/auth/register", "{\"name\":").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.tag, "BAD_REQUEST");
}

#[tokio::test]
async fn test_activation_link_is_single_use() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = registered_user(&server, &RegisterRequest::unique()).await;

    let response = server
        .get(&format!("/auth/activate/{}", user.id))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.tag, "EXPIRED");
    assert_eq!(body.message, "expired activation link");
}

// ============================================================================
// Password Login
// ============================================================================

#[tokio::test]
async fn test_login_requires_activation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/auth/register", &request).await.unwrap();

    let response = server
        .post("/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.tag, "DISABLED_USER");
}

#[tokio::test]
async fn test_login_and_fetch_profile() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    let user = registered_user(&server, &request).await;
    let login = logged_in(&server, &request).await;

    assert!(!login.session_id.is_empty());
    assert_ne!(login.access_token, login.refresh_token);

    for path in ["/users/me", "/auth/me"] {
        let response = server.get_auth(path, &login.access_token).await.unwrap();
        let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(me.id, user.id);
        assert!(me.enabled);
    }
}

#[tokio::test]
async fn test_current_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    registered_user(&server, &request).await;
    let login = logged_in(&server, &request).await;

    let response = server
        .get_auth("/auth/session", &login.access_token)
        .await
        .unwrap();
    let session: SessionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(session.id, login.session_id);
    assert!(session.active);

    let response = server
        .patch_auth("/auth/logout", &login.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth("/auth/session", &login.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    registered_user(&server, &request).await;

    let login = LoginRequest {
        email: request.email.clone(),
        password: Some("WrongPass999".to_string()),
    };
    let response = server.post("/auth/login", &login).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.message, "invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login = LoginRequest {
        email: format!("nobody{}@example.com", unique_suffix()),
        password: Some(TEST_PASSWORD.to_string()),
    };

    let response = server.post("/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_new_login_replaces_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    registered_user(&server, &request).await;

    let first = logged_in(&server, &request).await;
    let second = logged_in(&server, &request).await;

    let response = server
        .get_auth("/auth/sessions", &second.access_token)
        .await
        .unwrap();
    let sessions: Vec<SessionResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, second.session_id);
    assert!(sessions[0].active);
    assert_eq!(sessions[1].id, first.session_id);
    assert!(!sessions[1].active);
    assert_eq!(sessions[0].ip, "127.0.0.1");

    // The replaced session can no longer mint access tokens
    let response = server
        .post(
            "/auth/refresh",
            &RefreshRequest {
                refresh_token: first.refresh_token,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Tokens and Logout
// ============================================================================

#[tokio::test]
async fn test_refresh_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    registered_user(&server, &request).await;
    let login = logged_in(&server, &request).await;

    let response = server
        .post(
            "/auth/refresh",
            &RefreshRequest {
                refresh_token: login.refresh_token,
            },
        )
        .await
        .unwrap();
    let refreshed: RefreshResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth("/users/me", &refreshed.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    registered_user(&server, &request).await;
    let login = logged_in(&server, &request).await;

    let response = server
        .post(
            "/auth/refresh",
            &RefreshRequest {
                refresh_token: login.access_token,
            },
        )
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.message, "invalid refresh token");
}

#[tokio::test]
async fn test_logout() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    registered_user(&server, &request).await;
    let login = logged_in(&server, &request).await;

    let response = server
        .patch_auth("/auth/logout", &login.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .patch_auth("/auth/logout", &login.access_token)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.message, "active session not found");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/users/me").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.message, "access token not provided");

    let response = server.get_auth("/users/me", "garbage").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.message, "invalid access token");
}

// ============================================================================
// One-time Code Login
// ============================================================================

#[tokio::test]
async fn test_code_login() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::passwordless();
    let user = registered_user(&server, &request).await;

    let response = server
        .post("/auth/login", &LoginRequest::code_only(&request.email))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let code = server.active_code(&user.id).await.unwrap();
    let response = server
        .post(&format!("/auth/code/{}", user.id), &VerifyCodeRequest { code })
        .await
        .unwrap();
    let verified: VerifyResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(verified.user_id, user.id);

    let response = server
        .get_auth("/auth/me", &verified.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_code_login_wrong_code() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::passwordless();
    let user = registered_user(&server, &request).await;

    server
        .post("/auth/login", &LoginRequest::code_only(&request.email))
        .await
        .unwrap();
    let code = server.active_code(&user.id).await.unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let path = format!("/auth/code/{}", user.id);
    let response = server
        .post(&path, &VerifyCodeRequest { code: wrong.to_string() })
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.message, "incorrect otp code");

    // Malformed codes never reach the attempt counter
    for malformed in ["12", "abcdef"] {
        let response = server
            .post(&path, &VerifyCodeRequest { code: malformed.to_string() })
            .await
            .unwrap();
        assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_code_login_requires_activation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::passwordless();
    server.post("/auth/register", &request).await.unwrap();

    let response = server
        .post("/auth/login", &LoginRequest::code_only(&request.email))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.tag, "DISABLED_USER");
}

// ============================================================================
// Rate Limiting
// ============================================================================

#[tokio::test]
async fn test_rate_limit_per_client() {
    if !check_test_env() {
        return;
    }

    let mut config = test_config().unwrap();
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst = 2;
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    let mut statuses = Vec::new();
    for _ in 0..4 {
        statuses.push(server.get("/users/me").await.unwrap().status());
    }

    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));

    // Health probes are not rate limited
    let response = server.get_root("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}
